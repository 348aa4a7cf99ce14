use crate::plugins::PluginLoader;

/// Renders help for the commands the loader knows about
pub struct CommandService {
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn get_help(&self, loader: &PluginLoader, command: Option<&str>) -> String {
        if let Some(name) = command {
            let name = name.to_lowercase();
            if let Some(spec) = loader.commands().get(&name) {
                let mut help = format!("{}{} - {}", self.prefix, spec.word, spec.help);
                if spec.power_level > 0 {
                    help.push_str(&format!("\nRequires power level {}", spec.power_level));
                }
                return help;
            }
            return format!("Command {}{} not found", self.prefix, name);
        }

        // List all commands
        let mut help = "Available commands:\n".to_string();
        for (word, text) in loader.help_texts() {
            help.push_str(&format!("  {}{} - {}\n", self.prefix, word, text));
        }
        help
    }
}
