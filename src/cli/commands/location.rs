use crate::cli::parser::{Commands, LocationAction};
use crate::config::Config;
use crate::core::location::LocationLogic;
use crate::db::users::require_by_code;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::time::parse_optional_timestamp;
use crate::utils::validate::coords_from_flags;

use super::open_pool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Location { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_pool(cfg)?;

    match action {
        LocationAction::Share {
            student,
            lat,
            lng,
            accuracy,
            notes,
            at,
        } => {
            //
            // 1. Parse input
            //
            let coords = coords_from_flags(Some(*lat), Some(*lng), *accuracy)?
                .ok_or_else(|| AppError::InvalidCoordinates("missing position".into()))?;
            let at = parse_optional_timestamp(at.as_ref())?;

            //
            // 2. Store
            //
            let user = require_by_code(&pool.conn, student)?;
            let id = LocationLogic::share(&mut pool, &user, &coords, notes.as_deref(), at)?;

            success(format!(
                "Location {} shared for {} (record #{}).",
                coords.short(),
                user.student_code,
                id
            ));
        }

        LocationAction::List { student, limit } => {
            let tz = cfg.reference_tz()?;
            let user = require_by_code(&pool.conn, student)?;
            LocationLogic::print_history(&mut pool, &user, &tz, *limit)?;
        }

        LocationAction::Clear { student, all } => {
            let user = match (student.as_deref(), *all) {
                (Some(code), false) => Some(require_by_code(&pool.conn, code)?),
                _ => None,
            };
            let deleted = LocationLogic::clear(&mut pool, user.as_ref())?;

            let scope = user
                .as_ref()
                .map(|u| u.student_code.clone())
                .unwrap_or_else(|| "all students".into());
            success(format!("Cleared {} location record(s) for {}.", deleted, scope));
        }
    }

    Ok(())
}
