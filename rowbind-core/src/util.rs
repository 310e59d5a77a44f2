use std::fmt::{self, Display};

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Case insensitive check of the leading SQL keyword of a fragment.
pub fn starts_with_keyword(fragment: &str, keyword: &str) -> bool {
    let fragment = fragment.trim_start();
    fragment
        .get(..keyword.len())
        .is_some_and(|v| v.eq_ignore_ascii_case(keyword))
        && fragment[keyword.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_')
}

/// Display adapter for long statements, see [`truncate_long!`](crate::truncate_long).
pub struct Truncated<'a>(pub &'a str);

impl Display for Truncated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX: usize = 497;
        if self.0.len() <= MAX {
            return f.write_str(self.0.trim_end());
        }
        let mut end = MAX;
        while !self.0.is_char_boundary(end) {
            end -= 1;
        }
        write!(f, "{}...", self.0[..end].trim_end())
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::Truncated(::std::convert::AsRef::<str>::as_ref(&$query))
    };
}
