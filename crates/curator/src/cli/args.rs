use clap::{Parser, Subcommand, ValueEnum};
use curatorapp::auth::Role;
use curatorapp::model::{ItemId, ItemStatus};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "curator", bin_name = "curator", version)]
#[command(about = "Curate, feature and pin content items into one ordered feed", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding data.json and curator.toml
    #[arg(long, global = true, env = "CURATOR_DATA", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Role of the acting user
    #[arg(long, global = true, value_enum, default_value_t = RoleArg::Editor, help_heading = "Options")]
    pub role: RoleArg,

    /// Id of the acting user
    #[arg(long, global = true, default_value_t = 1, help_heading = "Options")]
    pub user: u64,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the module terms for every enabled module
    Init,

    /// Create a content item
    Create {
        /// Title of the item
        title: String,

        /// Item type
        #[arg(long = "type", default_value = "post")]
        item_type: String,

        /// Initial status
        #[arg(long, default_value = "publish")]
        status: ItemStatus,

        /// Author user id
        #[arg(long)]
        author: Option<u64>,
    },

    /// Curate an item into the feed
    Curate { id: ItemId },

    /// Remove an item (original or curated record) from the feed
    Uncurate { id: ItemId },

    /// Feature a curated item
    Feature {
        id: ItemId,

        /// Featured size key, e.g. 2x1
        #[arg(long)]
        size: Option<String>,
    },

    /// Stop featuring a curated item
    Unfeature { id: ItemId },

    /// Change the size of a featured item
    Resize { id: ItemId, size: String },

    /// Pin a curated item to the top of the feed
    Pin { id: ItemId },

    /// Unpin a curated item
    Unpin { id: ItemId },

    /// Submit the edit form for an item, as an editor would
    Save {
        id: ItemId,

        /// Tick the curate checkbox
        #[arg(long)]
        curate: bool,

        /// Tick the feature checkbox
        #[arg(long)]
        feature: bool,

        /// Tick the pin checkbox
        #[arg(long)]
        pin: bool,

        /// Featured size to submit
        #[arg(long)]
        size: Option<String>,

        /// Submit without a confirmation token
        #[arg(long)]
        no_token: bool,
    },

    /// Publish an item
    Publish { id: ItemId },

    /// Move an item back to draft
    Unpublish { id: ItemId },

    /// Move an item to the trash
    Trash { id: ItemId },

    /// Delete an item permanently
    Delete { id: ItemId },

    /// List the curated feed (or items of another type)
    #[command(alias = "ls")]
    List {
        /// List this item type instead of the curated feed
        #[arg(long = "type")]
        item_type: Option<String>,

        /// Show curated records as stored, without resolving originals
        #[arg(long)]
        admin: bool,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        per_page: usize,

        /// Do not move pinned items to the front
        #[arg(long)]
        no_sticky: bool,

        /// Ids to leave out
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<ItemId>,
    },

    /// Show an item and its curation state
    Show { id: ItemId },

    /// Show the pin list
    Pins,

    /// Show or dismiss the welcome notice
    Notice {
        #[arg(long)]
        dismiss: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Administrator,
    Editor,
    Author,
    Contributor,
    Subscriber,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Administrator => Role::Administrator,
            RoleArg::Editor => Role::Editor,
            RoleArg::Author => Role::Author,
            RoleArg::Contributor => Role::Contributor,
            RoleArg::Subscriber => Role::Subscriber,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_save_form() {
        let cli = Cli::try_parse_from([
            "curator", "save", "10", "--curate", "--feature", "--size", "2x1",
        ])
        .unwrap();
        match cli.command {
            Commands::Save {
                id,
                curate,
                feature,
                pin,
                size,
                ..
            } => {
                assert_eq!(id, ItemId(10));
                assert!(curate && feature && !pin);
                assert_eq!(size.as_deref(), Some("2x1"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn parses_list_flags() {
        let cli = Cli::try_parse_from([
            "curator", "ls", "--admin", "--page", "2", "--exclude", "3,4",
        ])
        .unwrap();
        match cli.command {
            Commands::List {
                admin,
                page,
                exclude,
                ..
            } => {
                assert!(admin);
                assert_eq!(page, 2);
                assert_eq!(exclude, vec![ItemId(3), ItemId(4)]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn acting_user_is_global() {
        let cli = Cli::try_parse_from(["curator", "pin", "4", "--role", "author", "--user", "7"]).unwrap();
        assert_eq!(cli.role, RoleArg::Author);
        assert_eq!(cli.user, 7);

        let cli = Cli::try_parse_from(["curator", "curate", "4"]).unwrap();
        assert_eq!(cli.role, RoleArg::Editor);
        assert_eq!(cli.user, 1);
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["curator", "create", "T", "--status", "bogus"]).is_err());
    }
}
