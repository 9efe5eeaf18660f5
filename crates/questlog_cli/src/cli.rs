use clap::{Args, Parser, Subcommand};
use questlog_core::{
    default_log_level, CampaignId, CharacterId, EventId, LocationId, NoteId, OrganizationId,
    UserId,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "questlog")]
#[command(version, about = "Campaign notebook for tabletop game masters")]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "QUESTLOG_DB", default_value = "questlog.sqlite3")]
    pub db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "QUESTLOG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it
    #[arg(long, global = true, env = "QUESTLOG_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--log-level` when given, otherwise the build-mode default.
    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(UserAction),
    /// Manage campaigns and their members
    #[command(subcommand)]
    Campaign(CampaignAction),
    /// Manage locations
    Location(LocationCommand),
    /// Manage organizations
    Organization(OrganizationCommand),
    /// Manage characters
    Character(CharacterCommand),
    /// Manage events
    Event(EventCommand),
    /// Manage notes and convert them into records
    Note(NoteCommand),
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Register a new user
    Add {
        username: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CampaignAction {
    /// Create a campaign
    Add {
        name: String,
        /// Dungeon master user id
        #[arg(long)]
        dm: UserId,
        #[arg(long)]
        description: Option<String>,
        /// Make the campaign publicly listed
        #[arg(long)]
        public: bool,
    },
    /// List campaigns a user runs or plays in
    List {
        #[arg(long)]
        user: UserId,
    },
    /// Show a campaign with its members
    Show {
        id: CampaignId,
    },
    /// Approve a user as campaign member
    Member {
        id: CampaignId,
        user: UserId,
    },
    /// Delete a campaign and everything in it
    Delete {
        id: CampaignId,
    },
}

/// Campaign every record command is scoped to.
#[derive(Args, Debug, Clone, Copy)]
pub struct CampaignScope {
    #[arg(long, env = "QUESTLOG_CAMPAIGN")]
    pub campaign: Option<CampaignId>,
}

#[derive(Args, Debug)]
pub struct LocationCommand {
    #[command(flatten)]
    pub scope: CampaignScope,
    #[command(subcommand)]
    pub action: LocationAction,
}

#[derive(Subcommand, Debug)]
pub enum LocationAction {
    /// Add a location
    Add(LocationFields),
    /// Replace every field of a location
    Edit {
        id: LocationId,
        #[command(flatten)]
        fields: LocationFields,
    },
    List,
    Show {
        id: LocationId,
    },
    Delete {
        id: LocationId,
    },
}

#[derive(Args, Debug)]
pub struct LocationFields {
    pub name: String,
    /// Hostility code (F, N, H, ?)
    #[arg(long)]
    pub hostility: Option<String>,
    /// Neighboring location id (repeatable)
    #[arg(long = "neighbor")]
    pub neighbors: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct OrganizationCommand {
    #[command(flatten)]
    pub scope: CampaignScope,
    #[command(subcommand)]
    pub action: OrganizationAction,
}

#[derive(Subcommand, Debug)]
pub enum OrganizationAction {
    /// Add an organization
    Add(OrganizationFields),
    /// Replace every field of an organization
    Edit {
        id: OrganizationId,
        #[command(flatten)]
        fields: OrganizationFields,
    },
    List,
    Show {
        id: OrganizationId,
    },
    Delete {
        id: OrganizationId,
    },
}

#[derive(Args, Debug)]
pub struct OrganizationFields {
    pub name: String,
    /// Headquarters location id
    #[arg(long)]
    pub location: Option<String>,
    /// Hostility code (F, N, H, ?)
    #[arg(long)]
    pub hostility: Option<String>,
    /// Related organization id (repeatable)
    #[arg(long = "related")]
    pub related: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct CharacterCommand {
    #[command(flatten)]
    pub scope: CampaignScope,
    #[command(subcommand)]
    pub action: CharacterAction,
}

#[derive(Subcommand, Debug)]
pub enum CharacterAction {
    /// Add a character
    Add(CharacterFields),
    /// Replace every field of a character; the player/non-player kind stays
    Edit {
        id: CharacterId,
        #[command(flatten)]
        fields: CharacterFields,
    },
    List,
    Show {
        id: CharacterId,
    },
    Delete {
        id: CharacterId,
    },
}

#[derive(Args, Debug)]
pub struct CharacterFields {
    pub name: String,
    #[arg(long)]
    pub race: Option<String>,
    /// Class code (A, B, Bd, C, D, F, M, P, R, Rg, S, W)
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub level: Option<String>,
    /// Origin location id
    #[arg(long)]
    pub origin: Option<String>,
    /// Organization id (repeatable)
    #[arg(long = "organization")]
    pub organizations: Vec<String>,
    /// Related character id (repeatable)
    #[arg(long = "related")]
    pub related_characters: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Create a player character instead of a non-player character
    #[arg(long)]
    pub player_character: bool,
    /// Player user id (player characters only)
    #[arg(long)]
    pub player: Option<String>,
    /// Hostility code (non-player characters only)
    #[arg(long)]
    pub hostility: Option<String>,
}

#[derive(Args, Debug)]
pub struct EventCommand {
    #[command(flatten)]
    pub scope: CampaignScope,
    #[command(subcommand)]
    pub action: EventAction,
}

#[derive(Subcommand, Debug)]
pub enum EventAction {
    /// Add an event
    Add(EventFields),
    /// Replace every field of an event
    Edit {
        id: EventId,
        #[command(flatten)]
        fields: EventFields,
    },
    List,
    Show {
        id: EventId,
    },
    Delete {
        id: EventId,
    },
}

#[derive(Args, Debug)]
pub struct EventFields {
    pub title: String,
    /// Start time, YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub start: String,
    /// End time, YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Organization id (repeatable)
    #[arg(long = "organization")]
    pub organizations: Vec<String>,
    /// Character id (repeatable)
    #[arg(long = "character")]
    pub characters: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct NoteCommand {
    #[command(flatten)]
    pub scope: CampaignScope,
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Add a note
    Add(NoteFields),
    /// Replace every field of a note
    Edit {
        id: NoteId,
        #[command(flatten)]
        fields: NoteFields,
    },
    List,
    Show {
        id: NoteId,
    },
    Delete {
        id: NoteId,
    },
    /// Show which record types a note can become
    Preview {
        id: NoteId,
    },
    /// Replace a note with a new record of the chosen type
    Convert {
        id: NoteId,
        /// Target type (location, organization, character, event)
        #[arg(long = "to")]
        target: String,
        /// Convert into a player character
        #[arg(long)]
        player_character: bool,
        /// Player user id for a player character
        #[arg(long)]
        player: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct NoteFields {
    pub title: String,
    /// Start time, YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub start: Option<String>,
    /// End time, YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub end: Option<String>,
    #[arg(long)]
    pub race: Option<String>,
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub level: Option<String>,
    #[arg(long)]
    pub hostility: Option<String>,
    /// Location id (repeatable)
    #[arg(long = "location")]
    pub locations: Vec<String>,
    /// Organization id (repeatable)
    #[arg(long = "organization")]
    pub organizations: Vec<String>,
    /// Character id (repeatable)
    #[arg(long = "character")]
    pub characters: Vec<String>,
    #[arg(long)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, NoteAction, UserAction};
    use clap::{CommandFactory, Parser};
    use questlog_core::default_log_level;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_note_convert_with_campaign_scope() {
        let campaign = uuid::Uuid::new_v4();
        let note = uuid::Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "questlog",
            "--json",
            "note",
            "--campaign",
            &campaign.to_string(),
            "convert",
            &note.to_string(),
            "--to",
            "character",
            "--player-character",
        ])
        .unwrap();

        assert!(cli.json);
        let Commands::Note(command) = cli.command else {
            panic!("expected note command");
        };
        assert_eq!(command.scope.campaign.map(|id| *id.as_uuid()), Some(campaign));
        match command.action {
            NoteAction::Convert {
                id,
                target,
                player_character,
                player,
            } => {
                assert_eq!(*id.as_uuid(), note);
                assert_eq!(target, "character");
                assert!(player_character);
                assert_eq!(player, None);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn logging_flags_resolve_level() {
        let cli = Cli::try_parse_from([
            "questlog",
            "--log-level",
            "warn",
            "--log-dir",
            "/var/log/questlog",
            "user",
            "add",
            "mira",
        ])
        .unwrap();
        assert_eq!(cli.effective_log_level(), "warn");
        assert_eq!(cli.log_dir.as_deref(), Some("/var/log/questlog"));
        assert!(matches!(cli.command, Commands::User(UserAction::Add { .. })));

        let cli = Cli::try_parse_from(["questlog", "user", "add", "mira"]).unwrap();
        assert_eq!(cli.effective_log_level(), default_log_level());
    }
}
