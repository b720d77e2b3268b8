//! Command-line definition.

use std::path::PathBuf;

use adminmeta_core::configuration::CrudView;
use adminmeta_core::roles::ROLE_CREATOR;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Resolve admin metadata for the entities of a relational schema.
#[derive(Parser, Debug)]
#[command(name = "adminmeta", version)]
pub struct Cli {
    #[command(flatten)]
    pub sources: SourceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the schema, configuration and role table are read from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// JSON array of entity schemas
    #[arg(long, env = "ADMINMETA_SCHEMA", global = true, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// JSON array of `{key, scope, value}` configuration overrides
    #[arg(long, env = "ADMINMETA_CONFIGURATION", global = true, value_name = "FILE")]
    pub configuration: Option<PathBuf>,

    /// JSON object mapping role names to capability lists
    #[arg(long, env = "ADMINMETA_ROLES", global = true, value_name = "FILE")]
    pub roles: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List active entities in navigation order
    Entities,

    /// Show resolved fields of an entity
    Fields { entity: String },

    /// Show relations of an entity visible to a role
    Relations {
        entity: String,
        #[arg(long, env = "ADMINMETA_ROLE", default_value = ROLE_CREATOR)]
        role: String,
    },

    /// Show the complete admin view of an entity for a role
    View {
        entity: String,
        #[arg(long, env = "ADMINMETA_ROLE", default_value = ROLE_CREATOR)]
        role: String,
    },

    /// Show columns hidden on one CRUD screen
    HiddenColumns {
        entity: String,
        #[arg(value_enum)]
        view: ViewArg,
    },

    /// Check a reference display format and print the form to store
    ValidateTemplate { entity: String, template: String },

    /// Check a JSON record against the effective validation rules
    ValidateRecord { entity: String, record: String },

    /// Render the reference label of a JSON record
    ReferenceLabel { entity: String, record: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ViewArg {
    Table,
    Create,
    Update,
    Details,
}

impl From<ViewArg> for CrudView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Table => CrudView::Table,
            ViewArg::Create => CrudView::Create,
            ViewArg::Update => CrudView::Update,
            ViewArg::Details => CrudView::Details,
        }
    }
}
