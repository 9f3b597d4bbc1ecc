use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::App;
use crate::models::Employee;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($registry:expr, $desc:expr, $func:expr, $($name:expr),+) => {{
        $(
            $registry.insert(
                $name,
                Command {
                    description: $desc,
                    run: $func,
                },
            );
        )+
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!(r, "Quit EmpTUI", cmd_quit, "quit", "q");
    register_command!(r, "Show every employee's transactions", cmd_all, "all", "a");
    register_command!(
        r,
        "Filter by employee name (e.g. :employee mary)",
        cmd_employee,
        "employee",
        "e"
    );
    register_command!(r, "Load the next page of transactions", cmd_more, "more", "m");
    register_command!(r, "Toggle approval of the selected transaction", cmd_approve, "approve");
    register_command!(r, "Drop cached data and load from scratch", cmd_reload, "reload");
    register_command!(r, "Show available commands", cmd_help, "help", "h");

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let (cmd_name, args) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args = args.trim();

    match COMMANDS.get(cmd_name) {
        Some(cmd) => (cmd.run)(args, app)?,
        None => {
            let suggestion = closest_command(cmd_name);
            app.set_status(format!(
                "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
            ));
        }
    }

    Ok(())
}

fn closest_command(input: &str) -> &'static str {
    COMMANDS
        .keys()
        .copied()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| (edit_distance(input, k), *k))
        .unwrap_or("help")
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = diag + usize::from(ca != *cb);
            diag = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diag + 1);
        }
    }

    row[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_all(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.employee_select.reset();
    app.select_employee(Some(Employee::empty()));
    Ok(())
}

fn cmd_employee(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :employee <name>");
        return Ok(());
    }
    let Some(employees) = app.employees.data() else {
        app.set_status("Employees are still loading");
        return Ok(());
    };
    let Some(found) = Employee::find_by_name(employees, args).cloned() else {
        app.set_status(format!("No employee matching '{args}'"));
        return Ok(());
    };
    app.employee_select.select(found.clone());
    app.select_employee(Some(found));
    Ok(())
}

fn cmd_more(_args: &str, app: &mut App) -> anyhow::Result<()> {
    if app.can_view_more() {
        app.view_more();
    } else {
        app.set_status("Nothing to load right now");
    }
    Ok(())
}

fn cmd_approve(_args: &str, app: &mut App) -> anyhow::Result<()> {
    if app.selected_transaction().is_none() {
        app.set_status("No transaction selected");
        return Ok(());
    }
    app.toggle_selected_approval();
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.reload();
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
