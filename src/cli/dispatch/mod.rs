//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an `Action` carrying everything it needs, so
//! actions never look at clap types.

use crate::cli::{
    actions::{account::RegisterArgs, Action, UsersCommand},
    commands::{account, users, ARG_API_URL, ARG_EMAIL, ARG_PASSWORD},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let mut globals = GlobalArgs::new(matches.get_one::<String>(ARG_API_URL).cloned());
    globals.set_credentials(
        matches.get_one::<String>(ARG_EMAIL).cloned(),
        matches
            .get_one::<String>(ARG_PASSWORD)
            .cloned()
            .map(SecretString::from),
    );

    match matches.subcommand() {
        Some((account::CMD_WHOAMI, _)) => Ok(Action::WhoAmI(globals)),
        Some((account::CMD_REGISTER, sub)) => Ok(Action::Register(
            globals,
            RegisterArgs {
                title: required(sub, account::ARG_TITLE)?,
                first_name: required(sub, account::ARG_FIRST_NAME)?,
                last_name: required(sub, account::ARG_LAST_NAME)?,
                accept_terms: sub.get_flag(account::ARG_ACCEPT_TERMS),
            },
        )),
        Some((account::CMD_VERIFY_EMAIL, sub)) => Ok(Action::VerifyEmail(
            globals,
            SecretString::from(required(sub, account::ARG_TOKEN)?),
        )),
        Some((account::CMD_FORGOT_PASSWORD, _)) => Ok(Action::ForgotPassword(globals)),
        Some((account::CMD_RESET_PASSWORD, sub)) => Ok(Action::ResetPassword(
            globals,
            SecretString::from(required(sub, account::ARG_TOKEN)?),
        )),
        Some((users::CMD_USERS, sub)) => {
            let command = match sub.subcommand() {
                Some((users::CMD_LIST, _)) => UsersCommand::List,
                Some((users::CMD_GET, args)) => UsersCommand::Get(required(args, users::ARG_ID)?),
                Some((users::CMD_DELETE, args)) => {
                    UsersCommand::Delete(required(args, users::ARG_ID)?)
                }
                other => return Err(anyhow!("unknown users command: {other:?}")),
            };
            Ok(Action::Users(globals, command))
        }
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
