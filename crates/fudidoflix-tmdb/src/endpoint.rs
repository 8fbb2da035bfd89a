use std::fmt;

/// A TMDB path plus its query parameters, without credentials or locale.
///
/// `Display` renders the canonical `path?k=v&...` form with parameters in
/// sorted order, which is also what logs and the canned test source key on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    path: String,
    params: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        Self {
            path,
            params: Vec::new(),
        }
    }

    /// Split a `"/path?a=b&c=d"` string as written in category tables.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };
        let mut endpoint = Self::new(path);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            endpoint = endpoint.param(key, value);
        }
        endpoint
    }

    /// Set a parameter, replacing an earlier value for the same key.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn param_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Full request URL. `api_key` and `language` are appended unless the
    /// endpoint already pins a language.
    pub fn to_url(&self, base_url: &str, api_key: &str, language: &str) -> String {
        let mut query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        query.push(format!("api_key={}", urlencoding::encode(api_key)));
        if !self.has("language") {
            query.push(format!("language={}", urlencoding::encode(language)));
        }
        format!("{}{}?{}", base_url.trim_end_matches('/'), self.path, query.join("&"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        let mut sorted: Vec<&(String, String)> = self.params.iter().collect();
        sorted.sort();
        for (i, (k, v)) in sorted.into_iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_endpoint() {
        let ep = Endpoint::parse("/discover/tv?with_genres=16&sort_by=popularity.desc");
        assert_eq!(ep.path(), "/discover/tv");
        assert_eq!(ep.get("with_genres"), Some("16"));
        assert_eq!(ep.get("sort_by"), Some("popularity.desc"));
        assert_eq!(ep.to_string(), "/discover/tv?sort_by=popularity.desc&with_genres=16");
    }

    #[test]
    fn test_param_replaces_existing_value() {
        let ep = Endpoint::new("/movie/popular").param("page", 1).param("page", 3);
        assert_eq!(ep.get("page"), Some("3"));
        assert_eq!(ep.to_string(), "/movie/popular?page=3");
    }

    #[test]
    fn test_url_appends_credentials_and_locale() {
        let ep = Endpoint::new("search/multi").param("query", "o poço");
        let url = ep.to_url("https://api.themoviedb.org/3/", "KEY", "pt-BR");
        assert_eq!(
            url,
            "https://api.themoviedb.org/3/search/multi?query=o%20po%C3%A7o&api_key=KEY&language=pt-BR"
        );
    }

    #[test]
    fn test_url_keeps_pinned_language() {
        let ep = Endpoint::parse("/discover/tv?with_networks=213&language=pt-BR");
        let url = ep.to_url("https://x.test/3", "K", "en-US");
        assert!(url.ends_with("with_networks=213&language=pt-BR&api_key=K"));
    }
}
