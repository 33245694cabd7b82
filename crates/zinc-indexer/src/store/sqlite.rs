//! SQLite store.
//!
//! Token amounts are stored as decimal TEXT since balances are `i128` and
//! supplies use the full `u64` range, neither of which fits SQLite's
//! INTEGER.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::IndexerError;
use crate::store::{check_cursor, Store};
use crate::types::{BalanceRecord, BlockBatch, Cursor, DeployRecord, InscriptionRecord};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cursor (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        last_scanned_block INTEGER NOT NULL,
        last_scan_time INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS inscriptions (
        txid TEXT NOT NULL PRIMARY KEY,
        block_height INTEGER NOT NULL,
        family TEXT NOT NULL,
        protocol_id INTEGER,
        operation TEXT NOT NULL,
        inscription TEXT NOT NULL,
        sender TEXT,
        recipient TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_inscriptions_block_height
    ON inscriptions (block_height);

    CREATE TABLE IF NOT EXISTS deploys (
        ticker TEXT NOT NULL PRIMARY KEY,
        deploy_txid TEXT NOT NULL UNIQUE,
        max_supply TEXT NOT NULL,
        mint_limit TEXT NOT NULL,
        decimals INTEGER NOT NULL,
        mint_price TEXT NOT NULL,
        deployer TEXT,
        deploy_height INTEGER NOT NULL,
        minted TEXT NOT NULL DEFAULT '0'
    );

    CREATE TABLE IF NOT EXISTS balances (
        address TEXT NOT NULL,
        ticker TEXT NOT NULL,
        balance TEXT NOT NULL,
        PRIMARY KEY (address, ticker)
    );
";

/// A [`Store`] persisted in a SQLite database file.
pub struct SqliteStore {
    db_path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self, IndexerError> {
        let conn = Connection::open(path).map_err(|e| {
            tracing::error!(path = %path.display(), "failed to open index database: {}", e);
            e
        })?;
        Self::init(conn, path.to_path_buf())
    }

    /// Open a private in-memory database.
    pub fn in_memory() -> Result<Self, IndexerError> {
        Self::init(Connection::open_in_memory()?, PathBuf::from(":memory:"))
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn init(conn: Connection, db_path: PathBuf) -> Result<Self, IndexerError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_amount<T: std::str::FromStr>(text: String, column: usize) -> rusqlite::Result<T> {
    text.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("invalid amount '{}'", text).into(),
        )
    })
}

fn deploy_from_row(row: &Row<'_>) -> rusqlite::Result<DeployRecord> {
    Ok(DeployRecord {
        ticker: row.get(0)?,
        deploy_txid: row.get(1)?,
        max_supply: parse_amount(row.get(2)?, 2)?,
        mint_limit: parse_amount(row.get(3)?, 3)?,
        decimals: row.get(4)?,
        mint_price: parse_amount(row.get(5)?, 5)?,
        deployer: row.get(6)?,
        deploy_height: row.get(7)?,
    })
}

const DEPLOY_COLUMNS: &str =
    "ticker, deploy_txid, max_supply, mint_limit, decimals, mint_price, deployer, deploy_height";

impl Store for SqliteStore {
    fn cursor(&self) -> Result<Option<Cursor>, IndexerError> {
        let conn = self.conn();
        let cursor = conn
            .query_row(
                "SELECT last_scanned_block, last_scan_time FROM cursor WHERE id = 1",
                [],
                |row| {
                    Ok(Cursor {
                        last_scanned_block: row.get(0)?,
                        last_scan_time: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(cursor)
    }

    fn deploy(&self, ticker: &str) -> Result<Option<DeployRecord>, IndexerError> {
        let conn = self.conn();
        let sql = format!("SELECT {} FROM deploys WHERE ticker = ?1", DEPLOY_COLUMNS);
        Ok(conn.query_row(&sql, [ticker], deploy_from_row).optional()?)
    }

    fn deploy_by_txid(&self, txid: &str) -> Result<Option<DeployRecord>, IndexerError> {
        let conn = self.conn();
        let sql = format!("SELECT {} FROM deploys WHERE deploy_txid = ?1", DEPLOY_COLUMNS);
        Ok(conn.query_row(&sql, [txid], deploy_from_row).optional()?)
    }

    fn minted(&self, ticker: &str) -> Result<u64, IndexerError> {
        let conn = self.conn();
        let minted = conn
            .query_row("SELECT minted FROM deploys WHERE ticker = ?1", [ticker], |row| {
                parse_amount(row.get(0)?, 0)
            })
            .optional()?;
        Ok(minted.unwrap_or(0))
    }

    fn balance(&self, address: &str, ticker: &str) -> Result<i128, IndexerError> {
        let conn = self.conn();
        let balance = conn
            .query_row(
                "SELECT balance FROM balances WHERE address = ?1 AND ticker = ?2",
                [address, ticker],
                |row| parse_amount(row.get(0)?, 0),
            )
            .optional()?;
        Ok(balance.unwrap_or(0))
    }

    fn balances_of(&self, address: &str) -> Result<Vec<BalanceRecord>, IndexerError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT ticker, balance FROM balances WHERE address = ?1 ORDER BY ticker",
        )?;
        let rows = stmt.query_map([address], |row| {
            Ok(BalanceRecord {
                address: address.to_string(),
                ticker: row.get(0)?,
                balance: parse_amount(row.get(1)?, 1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn inscription(&self, txid: &str) -> Result<Option<InscriptionRecord>, IndexerError> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT block_height, protocol_id, operation, inscription, sender, recipient
                 FROM inscriptions WHERE txid = ?1",
                [txid],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, Option<u8>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((block_height, protocol_id, operation, json, sender, recipient)) = row else {
            return Ok(None);
        };
        let inscription: zinc_inscription::Inscription = serde_json::from_str(&json)?;
        Ok(Some(InscriptionRecord {
            txid: txid.to_string(),
            block_height,
            family: inscription.family(),
            protocol_id,
            operation,
            inscription,
            sender,
            recipient,
        }))
    }

    fn commit_block(&self, batch: &BlockBatch) -> Result<(), IndexerError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let current = tx
            .query_row(
                "SELECT last_scanned_block, last_scan_time FROM cursor WHERE id = 1",
                [],
                |row| {
                    Ok(Cursor {
                        last_scanned_block: row.get(0)?,
                        last_scan_time: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()?;
        check_cursor(current, batch)?;

        for r in &batch.inscriptions {
            tx.execute(
                "INSERT OR IGNORE INTO inscriptions
                 (txid, block_height, family, protocol_id, operation, inscription, sender, recipient)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    r.txid,
                    r.block_height,
                    r.family.as_str(),
                    r.protocol_id,
                    r.operation,
                    serde_json::to_string(&r.inscription)?,
                    r.sender,
                    r.recipient,
                ],
            )?;
        }

        for d in &batch.deploys {
            tx.execute(
                "INSERT OR IGNORE INTO deploys
                 (ticker, deploy_txid, max_supply, mint_limit, decimals, mint_price, deployer, deploy_height)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    d.ticker,
                    d.deploy_txid,
                    d.max_supply.to_string(),
                    d.mint_limit.to_string(),
                    d.decimals,
                    d.mint_price.to_string(),
                    d.deployer,
                    d.deploy_height,
                ],
            )?;
        }

        for (ticker, minted) in &batch.minted {
            tx.execute(
                "UPDATE deploys SET minted = ?2 WHERE ticker = ?1",
                params![ticker, minted.to_string()],
            )?;
        }

        for b in &batch.balances {
            tx.execute(
                "INSERT INTO balances (address, ticker, balance) VALUES (?1, ?2, ?3)
                 ON CONFLICT(address, ticker) DO UPDATE SET balance = excluded.balance",
                params![b.address, b.ticker, b.balance.to_string()],
            )?;
        }

        tx.execute(
            "INSERT INTO cursor (id, last_scanned_block, last_scan_time) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET
                last_scanned_block = excluded.last_scanned_block,
                last_scan_time = excluded.last_scan_time",
            params![batch.cursor.last_scanned_block, batch.cursor.last_scan_time as i64],
        )?;

        tx.commit()?;
        Ok(())
    }
}
