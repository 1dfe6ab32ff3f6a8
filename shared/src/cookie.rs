//! `document.cookie` 解析
//!
//! 只在名称恰好出现一次时返回值；重复或空值都视为不存在。

/// 从 `a=1; b=2` 形式的 cookie 串中读取 `name`
pub fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }

    let mut matches = cookies
        .split(';')
        .map(str::trim_start)
        .filter_map(|pair| pair.strip_prefix(name)?.strip_prefix('='));

    let value = matches.next()?;
    if matches.next().is_some() {
        return None;
    }

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_named_cookie() {
        let cookies = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(find_cookie(cookies, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(find_cookie(cookies, "sessionid").as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(find_cookie("a=1; b=2", "csrftoken"), None);
        assert_eq!(find_cookie("", "csrftoken"), None);
    }

    #[test]
    fn test_prefix_names_do_not_match() {
        assert_eq!(find_cookie("xcsrftoken=1; csrftokenx=2", "csrftoken"), None);
    }

    #[test]
    fn test_duplicate_or_empty_is_none() {
        assert_eq!(find_cookie("csrftoken=1; csrftoken=2", "csrftoken"), None);
        assert_eq!(find_cookie("csrftoken=; other=1", "csrftoken"), None);
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(find_cookie("token=a=b; x=1", "token").as_deref(), Some("a=b"));
    }
}
