//! Line oriented prompts built on dialoguer.

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

/// `y` or `yes`, in any case
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Split `key=value`, the key must not be empty
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(format!("expected key=value, got '{input}'")),
    }
}

/// Ask a yes/no question, anything else than yes is a no
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{prompt} (y/N)"))
        .allow_empty(true)
        .interact_text()?;
    Ok(is_yes(&answer))
}

/// Warning followed by a yes/no gate
pub fn confirm_delete(name: &str, namespace: &str) -> Result<bool> {
    println!(
        "{} this deletes the deployment and service of {} in namespace {}",
        "WARNING:".yellow().bold(),
        name.bold(),
        namespace
    );
    confirm("Are you sure?")
}

pub fn required(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("a value is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(value.trim().to_owned())
}

pub fn with_default(prompt: &str, default: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()?;
    Ok(value.trim().to_owned())
}

/// Empty answers are allowed
pub fn optional(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_owned())
}

pub fn port(prompt: &str, default: u16) -> Result<u16> {
    let port: u16 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .validate_with(|port: &u16| -> Result<(), &str> {
            if *port == 0 {
                Err("port must be between 1 and 65535")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    Ok(port)
}

/// Read `key=value` entries until an empty line
pub fn key_values(prompt: &str) -> Result<Vec<(String, String)>> {
    let mut entries = vec![];
    loop {
        let entry: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{prompt} (key=value, empty to finish)"))
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                if input.trim().is_empty() {
                    Ok(())
                } else {
                    parse_key_value(input).map(|_| ())
                }
            })
            .interact_text()?;

        if entry.trim().is_empty() {
            return Ok(entries);
        }
        if let Ok(pair) = parse_key_value(&entry) {
            entries.push(pair);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_yes_answers() {
        for answer in ["y", "Y", "yes", "YES", "Yes", " y "] {
            assert!(is_yes(answer), "{answer}");
        }
    }

    #[test]
    fn test_no_answers() {
        for answer in ["", "n", "no", "yep", "ok", "true", "ye"] {
            assert!(!is_yes(answer), "{answer}");
        }
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("team=tools"),
            Ok(("team".to_owned(), "tools".to_owned()))
        );
        assert_eq!(
            parse_key_value(" url = http://a=b "),
            Ok(("url".to_owned(), "http://a=b".to_owned()))
        );
        assert_eq!(
            parse_key_value("empty="),
            Ok(("empty".to_owned(), String::new()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }
}
