//! Qt-style positional placeholder substitution (`%1`, `%2`, … and `%n`).

/// Replace `%1`…`%99` with `args` in order.
///
/// `%N` is replaced by `args[N - 1]` when that argument exists; every other
/// `%` sequence (`%0`, out-of-range indices, `%n`, a trailing `%`) is copied
/// through unchanged. Substitution is a single pass, so `%` sequences inside
/// the arguments are never expanded.
///
/// # Examples
/// ```
/// use qt_ts_catalog::catalog::substitute_args;
///
/// assert_eq!(
///     substitute_args("文件 %1 已存在，是否覆盖？", &["test.vsqx"]),
///     "文件 test.vsqx 已存在，是否覆盖？"
/// );
/// assert_eq!(substitute_args("%1 of %2", &["3"]), "3 of %2");
/// ```
#[must_use]
pub fn substitute_args(template: &str, args: &[&str]) -> String {
    substitute(template, args, None)
}

/// Like [`substitute_args`], additionally replacing `%n` with `count`.
#[must_use]
pub fn substitute_count(template: &str, count: i64, args: &[&str]) -> String {
    substitute(template, args, Some(count))
}

/// Single left-to-right scan; `%n` is only replaced when `count` is set.
fn substitute(template: &str, args: &[&str], count: Option<i64>) -> String {
    if !template.contains('%') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(index) = rest.find('%') {
        let (literal, tail) = rest.split_at(index);
        out.push_str(literal);
        // `tail` starts with '%'
        let after = tail.get(1..).unwrap_or_default();

        if let Some(count) = count
            && after.starts_with('n')
        {
            out.push_str(&count.to_string());
            rest = after.get(1..).unwrap_or_default();
            continue;
        }

        let digits = after.bytes().take(2).take_while(u8::is_ascii_digit).count();
        let argument = after
            .get(..digits)
            .and_then(|number| number.parse::<usize>().ok())
            .and_then(|number| number.checked_sub(1))
            .and_then(|position| args.get(position));

        if let Some(argument) = argument {
            out.push_str(argument);
            rest = after.get(digits..).unwrap_or_default();
        } else {
            out.push('%');
            rest = after;
        }
    }

    out.push_str(rest);
    out
}
