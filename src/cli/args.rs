//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::assistant::{DeviceType, InvalidDeviceTypeError, SettingsUpdate};

/// HomeVoice - voice client for a smart-home assistant
#[derive(Parser, Debug)]
#[command(name = "home-voice")]
#[command(version)]
#[command(about = "Voice client for a smart-home assistant: record, transcribe, and chat")]
#[command(long_about = None)]
pub struct Cli {
    /// Backend URL (overrides config and HOME_VOICE_SERVER)
    #[arg(short = 's', long, value_name = "URL", global = true)]
    pub server: Option<String>,

    /// Enable debug logging for this crate
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record from the microphone until Enter or Ctrl-C, then send it
    Listen {
        /// Replay a WAV file instead of using the microphone
        #[arg(short = 'i', long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Also write the encoded 16 kHz recording to this file
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,

        /// Input device name (see `home-voice inputs`)
        #[arg(short = 'd', long, value_name = "NAME", conflicts_with = "input")]
        device: Option<String>,
    },
    /// Send a typed message to the assistant
    Say {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show settings and devices
    State,
    /// Switch a device on or off
    Toggle {
        /// Device id
        id: String,
        /// Target state
        state: SwitchArg,
    },
    /// Manage devices
    Device {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Show or update assistant settings
    Settings(SettingsArgs),
    /// Register service words and command sequences
    Special {
        #[command(subcommand)]
        action: SpecialAction,
    },
    /// List audio input devices
    Inputs,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// On/off argument for toggle
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SwitchArg {
    On,
    Off,
}

impl SwitchArg {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Device subcommands
#[derive(Subcommand, Debug)]
pub enum DeviceAction {
    /// Register a new device
    Add {
        /// Device type (thermostat, vacuum, camera, coffee, ac, light, tv)
        #[arg(short = 't', long = "type", value_name = "TYPE", value_parser = parse_device_type)]
        device_type: DeviceType,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Create the device switched on
        #[arg(long)]
        on: bool,
    },
}

/// Special command subcommands
#[derive(Subcommand, Debug)]
pub enum SpecialAction {
    /// Add a service word
    Word {
        /// Word to add
        word: String,
    },
    /// Save a sequence that runs when its name is spoken
    Sequence {
        /// Phrase that triggers the sequence
        name: String,

        /// Command to run (repeat for each step, in order)
        #[arg(long = "step", value_name = "COMMAND", required = true)]
        steps: Vec<String>,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,
    },
}

fn parse_device_type(s: &str) -> Result<DeviceType, InvalidDeviceTypeError> {
    s.parse()
}

/// Settings flags; with none given, the current settings are shown
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Speak answers aloud
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub voice_answers: Option<bool>,

    /// Confirm commands without asking
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub auto_confirm: Option<bool>,

    /// Noise suppression flag forwarded to the backend
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub noise_suppression: Option<bool>,

    /// Allow emergency commands
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub emergency_commands: Option<bool>,

    /// Voice timbre name
    #[arg(long, value_name = "NAME")]
    pub voice_timbre: Option<String>,

    /// Speech speed (the backend clamps to 0.5..=1.5)
    #[arg(long, value_name = "FACTOR")]
    pub speech_speed: Option<f64>,

    /// Volume (the backend clamps to 0..=100)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub volume: Option<i64>,

    /// Reply tone
    #[arg(long, value_name = "NAME")]
    pub tone: Option<String>,
}

impl From<SettingsArgs> for SettingsUpdate {
    fn from(args: SettingsArgs) -> Self {
        Self {
            voice_answers: args.voice_answers,
            auto_confirm: args.auto_confirm,
            noise_suppression: args.noise_suppression,
            emergency_commands: args.emergency_commands,
            voice_timbre: args.voice_timbre,
            speech_speed: args.speech_speed,
            volume: args.volume,
            tone: args.tone,
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["server_url", "input_device", "request_timeout_secs"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_listen_defaults() {
        let cli = Cli::parse_from(["home-voice", "listen"]);
        assert!(cli.server.is_none());
        assert!(!cli.verbose);
        match cli.command {
            Commands::Listen {
                input,
                save,
                device,
            } => {
                assert!(input.is_none());
                assert!(save.is_none());
                assert!(device.is_none());
            }
            other => panic!("Expected Listen, got {:?}", other),
        }
    }

    #[test]
    fn cli_parses_listen_with_file() {
        let cli = Cli::parse_from([
            "home-voice",
            "listen",
            "--input",
            "clip.wav",
            "--save",
            "out.wav",
        ]);
        if let Commands::Listen { input, save, .. } = cli.command {
            assert_eq!(input, Some(PathBuf::from("clip.wav")));
            assert_eq!(save, Some(PathBuf::from("out.wav")));
        } else {
            panic!("Expected Listen command");
        }
    }

    #[test]
    fn listen_input_conflicts_with_device() {
        let result = Cli::try_parse_from([
            "home-voice",
            "listen",
            "--input",
            "clip.wav",
            "--device",
            "USB Mic",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_say_words() {
        let cli = Cli::parse_from(["home-voice", "say", "turn", "on", "the", "light"]);
        if let Commands::Say { text } = cli.command {
            assert_eq!(text.join(" "), "turn on the light");
        } else {
            panic!("Expected Say command");
        }
    }

    #[test]
    fn say_requires_text() {
        assert!(Cli::try_parse_from(["home-voice", "say"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["home-voice", "state", "--server", "http://hub:8000", "-v"]);
        assert_eq!(cli.server.as_deref(), Some("http://hub:8000"));
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_toggle() {
        let cli = Cli::parse_from(["home-voice", "toggle", "dev_1", "off"]);
        if let Commands::Toggle { id, state } = cli.command {
            assert_eq!(id, "dev_1");
            assert!(!state.is_on());
        } else {
            panic!("Expected Toggle command");
        }
    }

    #[test]
    fn toggle_rejects_unknown_state() {
        assert!(Cli::try_parse_from(["home-voice", "toggle", "dev_1", "maybe"]).is_err());
    }

    #[test]
    fn cli_parses_device_add() {
        let cli = Cli::parse_from([
            "home-voice",
            "device",
            "add",
            "--type",
            "light",
            "--name",
            "Hall lamp",
        ]);
        let Commands::Device {
            action:
                DeviceAction::Add {
                    device_type,
                    name,
                    on,
                },
        } = cli.command
        else {
            panic!("Expected Device Add command");
        };
        assert_eq!(device_type, DeviceType::Light);
        assert_eq!(name.as_deref(), Some("Hall lamp"));
        assert!(!on);
    }

    #[test]
    fn device_add_rejects_unknown_type() {
        let result = Cli::try_parse_from(["home-voice", "device", "add", "--type", "toaster"]);
        assert!(result.is_err());
    }

    #[test]
    fn settings_flags_build_update() {
        let cli = Cli::parse_from([
            "home-voice",
            "settings",
            "--noise-suppression",
            "off",
            "--volume",
            "40",
        ]);
        let Commands::Settings(args) = cli.command else {
            panic!("Expected Settings command");
        };
        let update = SettingsUpdate::from(args);
        assert_eq!(update.noise_suppression, Some(false));
        assert_eq!(update.volume, Some(40));
        assert!(update.voice_answers.is_none());
    }

    #[test]
    fn settings_without_flags_is_empty() {
        let cli = Cli::parse_from(["home-voice", "settings"]);
        let Commands::Settings(args) = cli.command else {
            panic!("Expected Settings command");
        };
        assert!(SettingsUpdate::from(args).is_empty());
    }

    #[test]
    fn cli_parses_special_sequence() {
        let cli = Cli::parse_from([
            "home-voice",
            "special",
            "sequence",
            "good night",
            "--step",
            "turn off the light",
            "--step",
            "lock the door",
        ]);
        let Commands::Special {
            action:
                SpecialAction::Sequence {
                    name,
                    steps,
                    description,
                },
        } = cli.command
        else {
            panic!("Expected Special Sequence command");
        };
        assert_eq!(name, "good night");
        assert_eq!(steps, vec!["turn off the light", "lock the door"]);
        assert!(description.is_empty());
    }

    #[test]
    fn special_sequence_requires_a_step() {
        let result = Cli::try_parse_from(["home-voice", "special", "sequence", "bedtime"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["home-voice", "config", "set", "server_url", "http://hub"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "server_url");
            assert_eq!(value, "http://hub");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("server_url"));
        assert!(is_valid_config_key("input_device"));
        assert!(is_valid_config_key("request_timeout_secs"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
