use clap::{Arg, ArgAction, Command};

pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_REGISTER: &str = "register";
pub const CMD_VERIFY_EMAIL: &str = "verify-email";
pub const CMD_FORGOT_PASSWORD: &str = "forgot-password";
pub const CMD_RESET_PASSWORD: &str = "reset-password";

pub const ARG_TITLE: &str = "title";
pub const ARG_FIRST_NAME: &str = "first-name";
pub const ARG_LAST_NAME: &str = "last-name";
pub const ARG_ACCEPT_TERMS: &str = "accept-terms";
pub const ARG_TOKEN: &str = "token";

fn token_arg() -> Arg {
    Arg::new(ARG_TOKEN)
        .long(ARG_TOKEN)
        .help("One-time token from the email")
        .required(true)
}

#[must_use]
pub fn subcommands() -> Vec<Command> {
    vec![
        Command::new(CMD_WHOAMI).about("Sign in and show the signed-in account"),
        Command::new(CMD_REGISTER)
            .about("Register a new account (uses --email and --password)")
            .arg(
                Arg::new(ARG_TITLE)
                    .long(ARG_TITLE)
                    .help("Title, e.g. Mr, Mrs, Ms")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_FIRST_NAME)
                    .long(ARG_FIRST_NAME)
                    .help("First name")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_LAST_NAME)
                    .long(ARG_LAST_NAME)
                    .help("Last name")
                    .required(true),
            )
            .arg(
                Arg::new(ARG_ACCEPT_TERMS)
                    .long(ARG_ACCEPT_TERMS)
                    .help("Accept the terms and conditions")
                    .action(ArgAction::SetTrue),
            ),
        Command::new(CMD_VERIFY_EMAIL)
            .about("Confirm an email address")
            .arg(token_arg()),
        Command::new(CMD_FORGOT_PASSWORD)
            .about("Request a password reset email (uses --email)"),
        Command::new(CMD_RESET_PASSWORD)
            .about("Set a new password (uses --password)")
            .arg(token_arg()),
    ]
}
