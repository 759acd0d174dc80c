// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, value_parser};

fn ledger() -> Arg {
    arg!(--ledger <LEDGER> "Ledger to work on: default|khoc").default_value("default")
}

fn json() -> Arg {
    arg!(--json "Print pretty JSON").action(ArgAction::SetTrue)
}

fn jsonl() -> Arg {
    arg!(--jsonl "Print one JSON object per line").action(ArgAction::SetTrue)
}

fn id() -> Arg {
    arg!(<ID> "Record id").value_parser(value_parser!(i64))
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and browse income and expenses")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a transaction")
                .arg(ledger())
                .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today"))
                .arg(arg!(--description <TEXT>).required(true))
                .arg(arg!(--category <CATEGORY>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--"type" <TYPE> "income|expense").required(true)),
        )
        .subcommand(
            Command::new("list")
                .about("List transactions")
                .arg(ledger())
                .arg(arg!(--month <MONTH> "YYYY-MM"))
                .arg(arg!(--"type" <TYPE> "income|expense"))
                .arg(arg!(--category <CATEGORY>))
                .arg(arg!(--sort <FIELD> "date|amount|description|category|type").default_value("date"))
                .arg(arg!(--order <ORDER> "asc|desc").default_value("desc"))
                .arg(arg!(--limit <N>).value_parser(value_parser!(usize)))
                .arg(json())
                .arg(jsonl()),
        )
        .subcommand(
            Command::new("update")
                .about("Change fields of a transaction")
                .arg(ledger())
                .arg(id())
                .arg(arg!(--date <DATE>))
                .arg(arg!(--description <TEXT>))
                .arg(arg!(--category <CATEGORY>))
                .arg(arg!(--amount <AMOUNT>))
                .arg(arg!(--"type" <TYPE>)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(ledger())
                .arg(id()),
        )
        .subcommand(
            Command::new("categories")
                .about("Show the category set, or the categories in use with --used")
                .arg(ledger())
                .arg(arg!(--used "Only categories that have transactions").action(ArgAction::SetTrue))
                .arg(json()),
        )
}

fn balance_command() -> Command {
    Command::new("balance")
        .about("Monthly opening balances")
        .subcommand_required(true)
        .subcommand(
            Command::new("set")
                .about("Create or replace the opening balance of a month")
                .arg(ledger())
                .arg(arg!(--month <MONTH> "YYYY-MM").required(true))
                .arg(
                    arg!(--amount <AMOUNT>)
                        .required(true)
                        .allow_negative_numbers(true),
                )
                .arg(arg!(--note <NOTE>))
                .arg(arg!(--"created-at" <TIMESTAMP> "RFC 3339 creation time override")),
        )
        .subcommand(
            Command::new("get")
                .about("Show the opening balance of a month")
                .arg(ledger())
                .arg(arg!(--month <MONTH>).required(true))
                .arg(json()),
        )
        .subcommand(
            Command::new("list")
                .about("List opening balances, newest month first")
                .arg(ledger())
                .arg(json())
                .arg(jsonl()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete the opening balance of a month")
                .arg(ledger())
                .arg(arg!(--month <MONTH>).required(true)),
        )
}

fn note_command() -> Command {
    Command::new("note")
        .about("Free-form notes")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(arg!(--title <TITLE>).required(true))
                .arg(arg!(--content <TEXT>).default_value("")),
        )
        .subcommand(
            Command::new("update")
                .arg(id())
                .arg(arg!(--title <TITLE>))
                .arg(arg!(--content <TEXT>)),
        )
        .subcommand(Command::new("rm").arg(id()))
        .subcommand(
            Command::new("list")
                .arg(arg!(--search <TERM> "Match title or content, ignoring case"))
                .arg(arg!(--sort <FIELD> "title|created|updated").default_value("updated"))
                .arg(arg!(--order <ORDER> "asc|desc").default_value("desc"))
                .arg(json())
                .arg(jsonl()),
        )
}

fn report_command() -> Command {
    Command::new("report")
        .about("Monthly summaries and printable reports")
        .subcommand_required(true)
        .subcommand(
            Command::new("months")
                .about("Months with any activity, newest first")
                .arg(ledger())
                .arg(json()),
        )
        .subcommand(
            Command::new("summary")
                .about("Balance calculation for one month")
                .arg(ledger())
                .arg(arg!(--month <MONTH> "YYYY-MM, defaults to the most recent month"))
                .arg(json()),
        )
        .subcommand(
            Command::new("pdf")
                .about("Render the monthly PDF report")
                .arg(ledger())
                .arg(arg!(--month <MONTH>).required(true))
                .arg(arg!(--renderer <RENDERER> "styled|template, overrides the configured one"))
                .arg(arg!(--out <DIR> "Directory to save into").default_value("."))
                .arg(arg!(--"report-date" <TEXT> "Text for the 'Generated on' line"))
                .arg(arg!(--open "Open in the system viewer instead of saving").action(ArgAction::SetTrue)),
        )
}

pub fn build_cli() -> Command {
    Command::new("congregation-accounts")
        .about("Bookkeeping for a congregation: transactions, opening balances, notes and monthly reports")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(tx_command())
        .subcommand(balance_command())
        .subcommand(note_command())
        .subcommand(report_command())
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(ledger())
                        .arg(arg!(--format <FORMAT> "csv|json").default_value("csv"))
                        .arg(arg!(--out <PATH>).required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Deployment settings")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(arg!(<KEY> "congregation_name|report.renderer|report.template"))
                        .arg(arg!(<VALUE>)),
                )
                .subcommand(Command::new("show").arg(json())),
        )
        .subcommand(
            Command::new("seed")
                .about("Load sample data for January 2024")
                .arg(ledger()),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
