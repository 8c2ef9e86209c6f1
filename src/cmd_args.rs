use std::ffi::OsString;

pub use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Profile to read the service URL and session location from. Default is 'default'.
    /// If the profile is not configured, built-in defaults are used.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Verbose mode
    /// Optional. Print debug logs to stderr.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Actions available from the command line and inside the shell
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        birthdate: Option<String>,
    },
    /// Log in and remember the session
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List all movies
    Movies,
    /// Show one movie card
    Movie { id: String },
    /// Show a movie's synopsis
    Synopsis { id: String },
    /// Show a genre
    Genre { name: String },
    /// Show a director
    Director { name: String },
    /// Show your profile and favorite movies
    Profile,
    /// Change profile fields; omitted fields are left as they are
    Edit {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        birthdate: Option<String>,
    },
    /// Add a movie to favorites, or remove it if it already is one
    Favorite { id: String },
    /// List your favorite movies
    Favorites,
    /// Delete your account
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Interactive session keeping views alive between commands
    Shell,
}

/// One line typed into the shell
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    verbose: bool,
    command: Command,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        Self::from_clap(ClapArgs::parse())
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            verbose: args.verbose,
            command: args.command.unwrap_or(Command::Shell),
        }
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}
