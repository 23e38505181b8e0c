//! Admin user actions. The session must land on the users screen, so the
//! route guard rejects non-admin accounts before any collection call.

use crate::{
    app_lib::AppError,
    cli::{
        actions::{context, print_alerts, sign_in, sign_out, UsersCommand},
        globals::GlobalArgs,
    },
    features::auth::types::Account,
    routes::{
        table::{Screen, ADMIN_USERS},
        UsersListScreen,
    },
};
use anyhow::{bail, Result};

/// # Errors
/// Returns an error if sign-in fails, the account is not an admin, or the
/// service rejects the call.
pub async fn execute(globals: &GlobalArgs, command: UsersCommand) -> Result<()> {
    let ctx = context(globals)?;
    if let Err(err) = sign_in(&ctx, globals).await {
        print_alerts(&ctx);
        return Err(err);
    }

    let location = ctx.router.navigate(ADMIN_USERS)?;
    if location.screen != Screen::AdminUsers {
        sign_out(&ctx).await;
        bail!("Admin role required");
    }

    let mut screen = UsersListScreen::new(&ctx);
    let result = match command {
        UsersCommand::List => screen.load().await.map(|users| {
            for user in users {
                print_row(user);
            }
        }),
        UsersCommand::Get(id) => ctx
            .store
            .accounts::<Account>()
            .get_by_id(&id)
            .await
            .and_then(|user| {
                serde_json::to_string_pretty(&user)
                    .map(|json| println!("{json}"))
                    .map_err(|err| AppError::Serialization(err.to_string()))
            }),
        UsersCommand::Delete(id) => screen.delete(&id).await.map(|()| {
            println!("deleted {id}");
        }),
    };

    print_alerts(&ctx);
    sign_out(&ctx).await;
    Ok(result?)
}

fn print_row(user: &Account) {
    println!(
        "{}\t{}\t{}\t{}",
        user.id,
        user.role,
        user.email.as_deref().unwrap_or("-"),
        user.display_name()
    );
}
