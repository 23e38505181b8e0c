use clap::{Arg, Command};

pub const CMD_USERS: &str = "users";
pub const CMD_LIST: &str = "list";
pub const CMD_GET: &str = "get";
pub const CMD_DELETE: &str = "delete";
pub const ARG_ID: &str = "id";

fn id_arg() -> Arg {
    Arg::new(ARG_ID).help("User id").required(true)
}

/// Admin user management. Requires an account with the Admin role.
#[must_use]
pub fn subcommand() -> Command {
    Command::new(CMD_USERS)
        .about("Manage users (Admin role required)")
        .subcommand_required(true)
        .subcommand(Command::new(CMD_LIST).about("List every user"))
        .subcommand(Command::new(CMD_GET).about("Show one user").arg(id_arg()))
        .subcommand(Command::new(CMD_DELETE).about("Delete a user").arg(id_arg()))
}
