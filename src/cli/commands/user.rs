use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::users::{insert_user, list_users};
use crate::errors::AppResult;
use crate::models::user::NewUser;
use crate::ui::messages::{success, warning};
use crate::utils::table::{Column, Table};
use crate::utils::validate::{validate_email, validate_name, validate_student_code};

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;

    match action {
        UserAction::Add {
            code,
            email,
            first_name,
            last_name,
        } => {
            validate_student_code(code)?;
            validate_email(email)?;
            validate_name(first_name, "First name")?;
            validate_name(last_name, "Last name")?;

            let new_user = NewUser {
                student_code: code.trim().to_string(),
                email: email.trim().to_string(),
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
            };

            let id = pool.unit_of_work(|tx| {
                let id = insert_user(tx, &new_user)?;
                ttlog(tx, "user_add", &new_user.student_code, &format!("registered as user {}", id))?;
                Ok(id)
            })?;

            success(format!(
                "Registered {} {} ({}) as user #{}.",
                new_user.first_name, new_user.last_name, new_user.student_code, id
            ));
        }

        UserAction::List => {
            let users = list_users(&pool.conn)?;
            if users.is_empty() {
                warning("No students registered.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 2),
                Column::new("Code", 4),
                Column::new("Name", 4),
                Column::new("Email", 5),
            ]);
            for u in &users {
                table.add_row(vec![
                    u.id.to_string(),
                    u.student_code.clone(),
                    u.full_name(),
                    u.email.clone(),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
