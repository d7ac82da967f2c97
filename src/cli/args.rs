//! Positional argument helpers and `name=value` flag parsing

use crate::error::CmdError;
use std::collections::BTreeMap;

/// Fail if any positional arguments remain
///
/// # Errors
///
/// Returns an error if:
/// - `args` is not empty
#[inline]
pub fn check_empty(args: &[String]) -> Result<(), CmdError> {
    if args.is_empty() {
        return Ok(());
    }
    Err(CmdError::unrecognized_args(args))
}

/// Accept at most one positional argument
///
/// # Errors
///
/// Returns an error if:
/// - More than one argument is given; the extra ones are named
#[inline]
pub fn zero_or_one_args(args: &[String]) -> Result<Option<String>, CmdError> {
    match args {
        [] => Ok(None),
        [single] => Ok(Some(single.clone())),
        [_, rest @ ..] => Err(CmdError::unrecognized_args(rest)),
    }
}

/// Parse a `KEY=VALUE` string
///
/// Usable directly as a clap value parser:
/// `Arg::new("config").long("config").value_parser(parse_key_value)`.
///
/// # Errors
///
/// Returns an error if:
/// - The string contains no `=`
#[inline]
pub fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) => Ok((name.to_owned(), value.to_owned())),
        None => Err(format!("badly formatted name value pair: {arg}")),
    }
}

/// Collect repeated `KEY=VALUE` flag values into a map
///
/// # Errors
///
/// Returns an error if:
/// - A pair is badly formatted
/// - The same name is given twice
#[inline]
pub fn collect_string_map<I, S>(pairs: I) -> Result<BTreeMap<String, String>, CmdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = BTreeMap::new();
    for pair in pairs {
        let (name, value) = parse_key_value(pair.as_ref()).map_err(CmdError::flag)?;
        if result.contains_key(&name) {
            return Err(CmdError::flag(format!("duplicate name specified: {name:?}")));
        }
        result.insert(name, value);
    }
    Ok(result)
}
