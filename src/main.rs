// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use log::error;

use congregation_accounts::{cli, commands, db};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    let result = match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
            Ok(())
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub),
        Some(("balance", sub)) => commands::balances::handle(&conn, sub),
        Some(("note", sub)) => commands::notes::handle(&conn, sub),
        Some(("report", sub)) => commands::reports::handle(&conn, sub),
        Some(("export", sub)) => commands::exporter::handle(&conn, sub),
        Some(("config", sub)) => commands::settings::handle(&conn, sub),
        Some(("seed", sub)) => commands::seed::handle(&conn, sub),
        Some(("doctor", _)) => commands::doctor::handle(&conn),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
