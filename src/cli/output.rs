//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::pagination::Pagination;
use crate::users::User;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Print one page of users
pub fn print_user_table(users: &[User], meta: &Pagination) {
    if users.is_empty() {
        info("No users found. Register one with POST /auth/register");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Username").fg(Color::Cyan),
            Cell::new("Email").fg(Color::Cyan),
            Cell::new("Full name").fg(Color::Cyan),
            Cell::new("Admin").fg(Color::Cyan),
            Cell::new("Verified").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for user in users {
        let admin = if user.is_admin {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no")
        };
        let verified = if user.is_email_verified {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(user.id),
            Cell::new(&user.username),
            Cell::new(&user.email),
            Cell::new(&user.full_name),
            admin,
            verified,
            Cell::new(user.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    println!(
        "Page {} of {} ({} users)",
        meta.page,
        meta.page_count.max(1),
        meta.total
    );
}
