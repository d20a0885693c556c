use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::types::{ColumnId, VALID_COLUMNS};

#[derive(Parser)]
#[command(name = "eventboard")]
#[command(about = "Kanban board for event planning")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Output options shared by commands that support `--json`
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the event board
    #[command(visible_alias = "b")]
    Board {
        /// Only show events matching this text (title, place, people, dates...)
        #[arg(short, long)]
        search: Option<String>,

        /// Server-side filter as key=value (repeatable)
        #[arg(short, long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display a single event
    #[command(visible_alias = "s")]
    Show {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new event
    #[command(visible_alias = "c")]
    Create {
        /// Event title
        title: String,

        /// Initial column: pending, in_progress, completed (default: pending)
        #[arg(long, default_value = "pending", value_parser = parse_column)]
        status: ColumnId,

        /// Event type (selects the starter checklist)
        #[arg(short = 't', long = "type")]
        event_type: Option<String>,

        /// Extra field as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move an event to a column, or before another event in the same column
    #[command(visible_alias = "mv")]
    Move {
        /// Event to move
        #[arg(value_parser = parse_record_id)]
        id: String,

        /// Column (pending, in_progress, completed or its status label) or event ID
        target: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit fields of an event
    #[command(visible_alias = "e")]
    Edit {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        id: String,

        /// Field to overwrite as key=value (repeatable)
        #[arg(long = "field", required = true, value_parser = parse_key_value)]
        fields: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an event
    #[command(visible_alias = "rm")]
    Delete {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage an event's checklist
    Checklist {
        #[command(subcommand)]
        action: ChecklistAction,
    },

    /// Manage comments on an event
    Comments {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// List team members
    Users {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ChecklistAction {
    /// Show the checklist, seeding it from the event type's template when empty
    #[command(visible_alias = "ls")]
    List {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        event_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an item
    Add {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        event_id: String,
        /// Item text
        text: String,
        /// Responsible user ID
        #[arg(short, long, value_parser = parse_record_id)]
        responsible: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark an item done, or not done if it already is
    Toggle {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        event_id: String,
        /// Checklist item ID
        #[arg(value_parser = parse_record_id)]
        item_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Assign an item to a user (omit --user to clear)
    Assign {
        /// Checklist item ID
        #[arg(value_parser = parse_record_id)]
        item_id: String,
        /// User ID
        #[arg(short, long, value_parser = parse_record_id)]
        user: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an item
    #[command(visible_alias = "rm")]
    Remove {
        /// Checklist item ID
        #[arg(value_parser = parse_record_id)]
        item_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum CommentAction {
    /// Show comments on an event
    #[command(visible_alias = "ls")]
    List {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        event_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a comment
    Add {
        /// Event ID
        #[arg(value_parser = parse_record_id)]
        event_id: String,
        /// Comment text
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a comment's text
    Edit {
        /// Comment ID
        #[arg(value_parser = parse_record_id)]
        id: String,
        /// New text
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a comment
    #[command(visible_alias = "rm")]
    Remove {
        /// Comment ID
        #[arg(value_parser = parse_record_id)]
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, request_timeout, unknown_status, rollback_placement)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (api_url, request_timeout, unknown_status, rollback_placement)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> Result<()> {
        use crate::commands::{
            cmd_board, cmd_checklist_add, cmd_checklist_assign, cmd_checklist_list,
            cmd_checklist_remove, cmd_checklist_toggle, cmd_comment_add, cmd_comment_edit,
            cmd_comment_remove, cmd_comments_list, cmd_config_get, cmd_config_set,
            cmd_config_show, cmd_create, cmd_delete, cmd_edit, cmd_move, cmd_show, cmd_users,
        };

        match self {
            Commands::Board {
                search,
                filters,
                json,
            } => cmd_board(search.as_deref(), filters, OutputOptions::new(json)).await,
            Commands::Show { id, json } => cmd_show(&id, OutputOptions::new(json)).await,
            Commands::Create {
                title,
                status,
                event_type,
                fields,
                json,
            } => {
                cmd_create(
                    &title,
                    status,
                    event_type.as_deref(),
                    fields,
                    OutputOptions::new(json),
                )
                .await
            }
            Commands::Move { id, target, json } => {
                cmd_move(&id, &target, OutputOptions::new(json)).await
            }
            Commands::Edit { id, fields, json } => {
                cmd_edit(&id, fields, OutputOptions::new(json)).await
            }
            Commands::Delete { id, json } => cmd_delete(&id, OutputOptions::new(json)).await,

            Commands::Checklist { action } => match action {
                ChecklistAction::List { event_id, json } => {
                    cmd_checklist_list(&event_id, OutputOptions::new(json)).await
                }
                ChecklistAction::Add {
                    event_id,
                    text,
                    responsible,
                    json,
                } => {
                    cmd_checklist_add(
                        &event_id,
                        &text,
                        responsible.as_deref(),
                        OutputOptions::new(json),
                    )
                    .await
                }
                ChecklistAction::Toggle {
                    event_id,
                    item_id,
                    json,
                } => cmd_checklist_toggle(&event_id, &item_id, OutputOptions::new(json)).await,
                ChecklistAction::Assign {
                    item_id,
                    user,
                    json,
                } => {
                    cmd_checklist_assign(&item_id, user.as_deref(), OutputOptions::new(json))
                        .await
                }
                ChecklistAction::Remove { item_id, json } => {
                    cmd_checklist_remove(&item_id, OutputOptions::new(json)).await
                }
            },

            Commands::Comments { action } => match action {
                CommentAction::List { event_id, json } => {
                    cmd_comments_list(&event_id, OutputOptions::new(json)).await
                }
                CommentAction::Add {
                    event_id,
                    text,
                    json,
                } => cmd_comment_add(&event_id, &text, OutputOptions::new(json)).await,
                CommentAction::Edit { id, text, json } => {
                    cmd_comment_edit(&id, &text, OutputOptions::new(json)).await
                }
                CommentAction::Remove { id, json } => {
                    cmd_comment_remove(&id, OutputOptions::new(json)).await
                }
            },

            Commands::Users { json } => cmd_users(OutputOptions::new(json)).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(OutputOptions::new(json)),
                ConfigAction::Set { key, value, json } => {
                    cmd_config_set(&key, &value, OutputOptions::new(json))
                }
                ConfigAction::Get { key, json } => cmd_config_get(&key, OutputOptions::new(json)),
            },
        }
    }
}

fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> std::result::Result<T, String>
where
    F: FnOnce(&str) -> std::result::Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_column(s: &str) -> std::result::Result<ColumnId, String> {
    parse_with_validation(
        s,
        |v| v.parse().map_err(|_| String::new()),
        "status",
        VALID_COLUMNS,
    )
}

fn parse_record_id(s: &str) -> std::result::Result<String, String> {
    if s.trim().is_empty() {
        return Err("ID cannot be empty".to_string());
    }
    if s.contains('/') {
        return Err("ID cannot contain '/'".to_string());
    }
    Ok(s.to_string())
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
