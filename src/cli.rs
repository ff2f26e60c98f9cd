// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("assetbook")
        .about("Double-entry household ledger and monthly asset valuation")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the database and the household owner"))
        .subcommand(
            Command::new("seed").about("Create the owner and a default chart of accounts"),
        )
        .subcommand(
            Command::new("account")
                .about("Manage ledger accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("asset|liability|expense|revenue"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List accounts with usage counts"),
                ))
                .subcommand(
                    Command::new("rename")
                        .about("Rename an account (the kind is immutable)")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("new_name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an account with zero entries")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("asset")
                .about("Manage tracked asset items")
                .subcommand(
                    Command::new("add")
                        .about("Add an asset item")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("cash|stock|pension|real_estate|loan|eso|rental"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List asset items")))
                .subcommand(
                    Command::new("rename")
                        .about("Rename an asset item (the category is immutable)")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("new_name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an asset item and all its value snapshots")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list ledger transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record one balanced transaction")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Unsigned magnitude"),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .required(true)
                                .help("Credit account (value flows out)"),
                        )
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .help("Debit account (value flows in)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List recent transactions grouped by month")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("value")
                .about("Record and list monthly asset values")
                .subcommand(
                    Command::new("set")
                        .about("Upsert the value of an asset for a month")
                        .arg(Arg::new("asset").long("asset").required(true))
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List recorded values for a month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("YYYY-MM (default: current month)"),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated ledger and valuation reports")
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Rolling income/expense/net per month")
                        .arg(
                            Arg::new("end")
                                .long("end")
                                .help("Anchor month YYYY-MM (default: current month)"),
                        )
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .default_value("12"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("snapshot")
                        .about("Category totals and net worth for a month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("YYYY-MM (default: current month)"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("annual")
                        .about("Monthly net-worth series for a year")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32))
                                .help("Target year (default: current year)"),
                        ),
                )),
        )
        .subcommand(
            Command::new("import")
                .about("Batch import")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV as one atomic batch")
                        .arg(Arg::new("file").long("file").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("values")
                        .about("Export asset value snapshots")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check ledger invariants"))
}
