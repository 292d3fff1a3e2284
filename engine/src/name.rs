/// An application name split into its group key and variant suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName<'a> {
    /// Everything before the last `.`, or the whole name when there is none
    pub group_key: &'a str,

    /// The last dot-segment, absent for dot-free names
    pub profile_type: Option<&'a str>,
}

/// Split `name` at its last `.`.
///
/// Only the final segment is treated as the profile type, so
/// `triple.app.cpu` parses to group `triple.app` and type `cpu`.
pub fn parse(name: &str) -> ParsedName<'_> {
    match name.rsplit_once('.') {
        Some((group_key, profile_type)) => ParsedName {
            group_key,
            profile_type: Some(profile_type),
        },
        None => ParsedName {
            group_key: name,
            profile_type: None,
        },
    }
}
