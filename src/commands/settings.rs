// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::config::{
    CONGREGATION_NAME, REPORT_RENDERER, REPORT_TEMPLATE, Settings, set_setting,
};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("KEY").map(String::as_str).unwrap_or_default();
            let value = sub.get_one::<String>("VALUE").map(String::as_str).unwrap_or_default();
            set_setting(conn, key.trim(), value)?;
            println!("{} = {}", key.trim(), value.trim());
        }
        Some(("show", sub)) => {
            let settings = Settings::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), false, &settings)? {
                let rows = vec![
                    vec![
                        CONGREGATION_NAME.to_string(),
                        settings.congregation_name.clone().unwrap_or_default(),
                    ],
                    vec![REPORT_RENDERER.to_string(), settings.renderer.to_string()],
                    vec![REPORT_TEMPLATE.to_string(), settings.template_location.clone()],
                ];
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
