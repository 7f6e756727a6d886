//! CLI argument parsing with clap.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::compose::Layout;
use crate::model::Attributes;
use crate::output::{DEFAULT_CARD_FILE, DEFAULT_IMAGE_FILE};

/// Personalized birthday card generator.
#[derive(Parser, Debug)]
#[command(name = "cardgen", version, about)]
pub struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the image prompt for the given attributes without calling the provider.
    Prompt(AttributeArgs),

    /// Generate a card PDF.
    Card(CardArgs),

    /// Serve the web form.
    Serve(ServeArgs),
}

/// Personalization attributes.
#[derive(Args, Debug, Clone)]
pub struct AttributeArgs {
    /// Recipient age.
    #[arg(long)]
    pub age: String,

    /// Gender or noun for the recipient (e.g. woman, boy).
    #[arg(long)]
    pub gender: Option<String>,

    /// Interests, repeated or comma-separated, in order.
    #[arg(long, value_delimiter = ',')]
    pub interests: Vec<String>,

    /// Art style (e.g. watercolor).
    #[arg(long)]
    pub style: Option<String>,

    /// Color scheme (e.g. pastel).
    #[arg(long)]
    pub color_scheme: Option<String>,

    /// Recipient name for the greeting.
    #[arg(long)]
    pub name: Option<String>,
}

impl AttributeArgs {
    /// Convert flags into pipeline attributes.
    #[must_use]
    pub fn to_attributes(&self) -> Attributes {
        Attributes {
            age: self.age.clone(),
            gender: self.gender.clone(),
            interests: self
                .interests
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            style: self.style.clone(),
            color_scheme: self.color_scheme.clone(),
            name: self.name.clone(),
        }
    }
}

/// Page layout choice.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutArg {
    /// Image on the left half, greeting on the right (landscape).
    Split,
    /// Image centered in the top half (portrait).
    Centered,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Split => Layout::Split,
            LayoutArg::Centered => Layout::Centered,
        }
    }
}

/// Arguments for `card`.
#[derive(Args, Debug)]
pub struct CardArgs {
    /// Personalization attributes.
    #[command(flatten)]
    pub attributes: AttributeArgs,

    /// Page layout.
    #[arg(short, long, value_enum, default_value_t = LayoutArg::Split)]
    pub layout: LayoutArg,

    /// Output PDF path (defaults per layout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also save the downloaded image as a timestamped PNG in this directory.
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,
}

impl CardArgs {
    /// The explicit output path, or the layout's default file name.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| match self.layout {
            LayoutArg::Split => PathBuf::from(DEFAULT_CARD_FILE),
            LayoutArg::Centered => PathBuf::from(DEFAULT_IMAGE_FILE),
        })
    }
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Listen address (overrides config).
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Directory for generated PDFs (overrides config).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Also archive downloaded images in this directory.
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_subcommand() {
        let cli = Cli::parse_from(["cardgen", "prompt", "--age", "5"]);
        match cli.command {
            Command::Prompt(args) => {
                assert_eq!(args.age, "5");
                assert!(args.interests.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn interests_comma_and_repeated() {
        let cli = Cli::parse_from([
            "cardgen",
            "prompt",
            "--age",
            "30",
            "--interests",
            "travel,photography",
            "--interests",
            "cats",
        ]);
        let Command::Prompt(args) = cli.command else { panic!("expected prompt") };
        assert_eq!(args.to_attributes().interests, vec!["travel", "photography", "cats"]);
    }

    #[test]
    fn card_defaults() {
        let cli = Cli::parse_from(["cardgen", "card", "--age", "5"]);
        assert!(!cli.verbose);
        let Command::Card(args) = cli.command else { panic!("expected card") };
        assert_eq!(args.layout, LayoutArg::Split);
        assert_eq!(args.output_path(), PathBuf::from("birthday_card.pdf"));
        assert!(args.archive_dir.is_none());
    }

    #[test]
    fn centered_default_output() {
        let cli = Cli::parse_from(["cardgen", "card", "--age", "5", "--layout", "centered"]);
        let Command::Card(args) = cli.command else { panic!("expected card") };
        assert_eq!(args.output_path(), PathBuf::from("generated_image.pdf"));
        assert_eq!(Layout::from(args.layout), Layout::Centered);
    }

    #[test]
    fn all_card_options() {
        let cli = Cli::parse_from([
            "cardgen",
            "-v",
            "--config",
            "c.toml",
            "card",
            "--age",
            "30",
            "--gender",
            "woman",
            "--style",
            "watercolor",
            "--color-scheme",
            "pastel",
            "--name",
            "Alice",
            "-o",
            "alice.pdf",
            "--archive-dir",
            "imgs",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("c.toml"));
        let Command::Card(args) = cli.command else { panic!("expected card") };
        let attrs = args.attributes.to_attributes();
        assert_eq!(attrs.gender.as_deref(), Some("woman"));
        assert_eq!(attrs.color_scheme.as_deref(), Some("pastel"));
        assert_eq!(attrs.name.as_deref(), Some("Alice"));
        assert_eq!(args.output_path(), PathBuf::from("alice.pdf"));
        assert_eq!(args.archive_dir, Some(PathBuf::from("imgs")));
    }

    #[test]
    fn missing_age_is_rejected() {
        assert!(Cli::try_parse_from(["cardgen", "card"]).is_err());
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::parse_from(["cardgen", "serve", "--bind", "127.0.0.1:0"]);
        let Command::Serve(args) = cli.command else { panic!("expected serve") };
        assert_eq!(args.bind, Some("127.0.0.1:0".parse().unwrap()));
        assert!(args.output_dir.is_none());
    }
}
