//! Runnable Fiesta server.
//!
//! Environment:
//! - `FIESTA_BIND`: listen address. Defaults to `0.0.0.0:$PORT`.
//! - `PORT`: listen port when `FIESTA_BIND` is unset. Defaults to 3001.
//! - `FIESTA_CATALOG`: path to a JSON array of `{id, text}` statements.
//! - `FIESTA_BOMBS`: `compact` for the 3/5/7 bomb table.
//! - `RUST_LOG`: tracing filter, `info` by default.

use std::sync::Arc;

use fiesta::prelude::*;

const DEFAULT_PORT: &str = "3001";

fn bind_addr() -> String {
    std::env::var("FIESTA_BIND").unwrap_or_else(|_| {
        let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        format!("0.0.0.0:{port}")
    })
}

fn load_catalog() -> StatementCatalog {
    let Ok(path) = std::env::var("FIESTA_CATALOG") else {
        tracing::warn!("FIESTA_CATALOG not set, yo nunca has no statements");
        return StatementCatalog::default();
    };
    match StatementCatalog::from_path(&path) {
        Ok(catalog) => {
            tracing::info!(%path, statements = catalog.len(), "catalog loaded");
            catalog
        }
        Err(e) => {
            tracing::error!(%path, error = %e, "failed to load catalog, starting empty");
            StatementCatalog::default()
        }
    }
}

fn bomb_table() -> BombTable {
    match std::env::var("FIESTA_BOMBS").as_deref() {
        Ok("compact") => BombTable::compact(),
        _ => BombTable::default(),
    }
}

#[tokio::main]
async fn main() -> Result<(), FiestaError> {
    fiesta::init_tracing();

    let addr = bind_addr();
    let server = FiestaServer::builder()
        .bind(&addr)
        .bomb_table(bomb_table())
        .catalog(Arc::new(load_catalog()))
        .build()
        .await?;

    if let Ok(local) = server.local_addr() {
        tracing::info!(addr = %local, "party server listening");
    }
    server.run().await
}
