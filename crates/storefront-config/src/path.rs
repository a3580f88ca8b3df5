use std::{env, iter::Peekable, path::PathBuf, str::Chars};

use crate::error::{ConfigError, Result};

/// Returns the user's home directory from `HOME`, falling back to `/`.
pub fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// `$XDG_CONFIG_HOME`, or `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// `$XDG_DATA_HOME`, or `$HOME/.local/share`.
pub fn xdg_data_home() -> PathBuf {
    env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Resolves a path string that may contain environment variables.
///
/// Expands `$VAR` and `${VAR}`, a leading `~`, and makes relative paths
/// absolute against the current directory.
///
/// # Errors
///
/// * [`ConfigError::EmptyPath`] if the path is empty
/// * [`ConfigError::MissingEnvVar`] if a referenced variable is undefined
/// * [`ConfigError::UnclosedVariable`] for `${VAR` without the closing brace
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let path = path.trim();

    if path.is_empty() {
        return Err(ConfigError::EmptyPath);
    }

    let path_buf = PathBuf::from(expand_variables(path)?);

    if path_buf.is_absolute() {
        Ok(path_buf)
    } else {
        Ok(env::current_dir()?.join(path_buf))
    }
}

fn expand_variables(path: &str) -> Result<String> {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => {
                let var_name = if chars.peek() == Some(&'{') {
                    chars.next();
                    consume_until(&mut chars, '}')
                        .ok_or_else(|| ConfigError::UnclosedVariable(path.to_string()))?
                } else {
                    consume_var_name(&mut chars)
                };

                if var_name.is_empty() {
                    result.push('$');
                    continue;
                }

                let value = match var_name.as_str() {
                    "HOME" => home_dir().to_string_lossy().into_owned(),
                    "XDG_CONFIG_HOME" => xdg_config_home().to_string_lossy().into_owned(),
                    "XDG_DATA_HOME" => xdg_data_home().to_string_lossy().into_owned(),
                    _ => env::var(&var_name).map_err(|_| ConfigError::MissingEnvVar {
                        var: var_name.clone(),
                        input: path.to_string(),
                    })?,
                };
                result.push_str(&value);
            }
            '~' if result.is_empty() => result.push_str(&home_dir().to_string_lossy()),
            _ => result.push(c),
        }
    }

    Ok(result)
}

fn consume_until(chars: &mut Peekable<Chars>, delimiter: char) -> Option<String> {
    let mut var_name = String::new();

    for c in chars.by_ref() {
        if c == delimiter {
            return Some(var_name);
        }
        var_name.push(c);
    }

    None
}

fn consume_var_name(chars: &mut Peekable<Chars>) -> String {
    let mut var_name = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            var_name.push(c);
            chars.next();
        } else {
            break;
        }
    }

    var_name
}
