// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .default_value("1")
        .value_parser(clap::value_parser!(i64))
        .help("User id owning the records")
}

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
    Command::new("moneyledger")
        .about("Multi-account personal ledger with savings tracking and recurring schedules")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("bank|cash|wallet|credit-card"),
                        )
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .help("Opening balance"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("update")
                        .arg(user_arg())
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("kind").long("kind").help("bank|cash|wallet|credit-card"))
                        .arg(Arg::new("status").long("status").help("ACTIVE|INACTIVE")),
                )
                .subcommand(
                    Command::new("rm").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and manage ledger transactions")
                .subcommand(tx_input_args(Command::new("add").arg(user_arg())))
                .subcommand(tx_input_args(
                    Command::new("update").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ))
                .subcommand(
                    Command::new("rm").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("type").long("type"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("savings")
                .about("Inspect and correct savings records")
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("correct")
                        .arg(user_arg())
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(Arg::new("current-value").long("current-value"))
                        .arg(Arg::new("maturity").long("maturity").help("YYYY-MM-DD"))
                        .arg(Arg::new("status").long("status").help("ACTIVE|INACTIVE"))
                        .arg(Arg::new("description").long("description")),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring transaction definitions")
                .subcommand(recurring_input_args(Command::new("add").arg(user_arg())))
                .subcommand(recurring_input_args(
                    Command::new("update").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ))
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("skip").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("rm").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(user_arg())
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}

fn tx_input_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("account")
            .long("account")
            .required(true)
            .value_parser(clap::value_parser!(i64))
            .help("Account id"),
    )
    .arg(Arg::new("amount").long("amount").required(true))
    .arg(
        Arg::new("type")
            .long("type")
            .required(true)
            .help("INCOME|EXPENSE|SAVINGS|WITHDRAW|SELF_TRANSFER"),
    )
    .arg(Arg::new("category").long("category").required(true))
    .arg(
        Arg::new("date")
            .long("date")
            .required(true)
            .help("YYYY-MM-DD"),
    )
    .arg(
        Arg::new("description")
            .long("description")
            .default_value(""),
    )
    .arg(
        Arg::new("withdraw-from")
            .long("withdraw-from")
            .value_parser(clap::value_parser!(i64))
            .help("Id of the SAVINGS transaction being drawn down"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_parser(clap::value_parser!(i64))
            .help("Destination account id for SELF_TRANSFER"),
    )
}

fn recurring_input_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("account")
            .long("account")
            .required(true)
            .value_parser(clap::value_parser!(i64)),
    )
    .arg(Arg::new("amount").long("amount").required(true))
    .arg(
        Arg::new("type")
            .long("type")
            .required(true)
            .help("INCOME|EXPENSE|SAVINGS|WITHDRAW|SELF_TRANSFER"),
    )
    .arg(Arg::new("category").long("category").required(true))
    .arg(
        Arg::new("description")
            .long("description")
            .default_value(""),
    )
    .arg(
        Arg::new("frequency")
            .long("frequency")
            .required(true)
            .help("DAILY|WEEKLY|MONTHLY|CUSTOM"),
    )
    .arg(
        Arg::new("custom-days")
            .long("custom-days")
            .value_parser(clap::value_parser!(i64))
            .help("Step in days when --frequency CUSTOM"),
    )
    .arg(
        Arg::new("start")
            .long("start")
            .required(true)
            .help("YYYY-MM-DD[ HH:MM:SS]"),
    )
    .arg(Arg::new("end").long("end").help("YYYY-MM-DD[ HH:MM:SS]"))
}
