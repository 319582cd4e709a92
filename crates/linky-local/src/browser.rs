//! Producer trigger that opens the target URL in the user's browser, where an
//! extension scrapes the page and writes the cache entry.

use crate::shellout;
use linky_core::ProducerTrigger;

#[derive(Debug, Clone)]
pub struct BrowserTrigger {
    program: String,
    args: Vec<String>,
}

impl BrowserTrigger {
    /// `command` overrides the platform opener. It is split on whitespace,
    /// single or double quotes group words (`open -a "Google Chrome"`), and
    /// the URL is appended as the final argument.
    pub fn new(command: Option<&str>) -> Self {
        let mut parts: Vec<String> = command
            .map(split_command)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(platform_opener);
        let program = parts.remove(0);
        Self {
            program,
            args: parts,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|a| {
                if a.is_empty() || a.contains(char::is_whitespace) {
                    format!("\"{a}\"")
                } else {
                    a.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Program and arguments for opening `url`; the URL is one untouched argument.
    pub fn argv(&self, url: &str) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .chain(std::iter::once(url.to_string()))
            .collect()
    }

    pub fn available(&self) -> bool {
        shellout::has(&self.program)
    }
}

fn platform_opener() -> Vec<String> {
    let v: &[&str] = if cfg!(target_os = "macos") {
        &["open"]
    } else if cfg!(windows) {
        // No shell in between: cmd.exe would split the URL at `&`.
        &["rundll32", "url.dll,FileProtocolHandler"]
    } else {
        &["xdg-open"]
    };
    v.iter().map(|s| s.to_string()).collect()
}

fn split_command(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => word.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            None => {
                word.push(c);
                in_word = true;
            }
        }
    }
    // An unclosed quote runs to the end of the command.
    if in_word {
        words.push(word);
    }
    words
}

#[async_trait::async_trait]
impl ProducerTrigger for BrowserTrigger {
    async fn trigger(&self, target_url: &str) {
        let argv = self.argv(target_url);
        match shellout::spawn_detached(&argv[0], &argv[1..]) {
            Ok(()) => tracing::info!(url = target_url, opener = %self.program, "producer triggered"),
            Err(code) => {
                tracing::warn!(url = target_url, opener = %self.program, code, "producer trigger failed")
            }
        }
    }
}
