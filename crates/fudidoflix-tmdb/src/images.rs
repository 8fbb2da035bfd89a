use fudidoflix_config::TmdbConfig;

/// Turns TMDB image paths into absolute URLs.
#[derive(Debug, Clone)]
pub struct ImageUrls {
    poster_base: String,
    backdrop_base: String,
}

impl ImageUrls {
    pub fn new(poster_base: impl Into<String>, backdrop_base: impl Into<String>) -> Self {
        Self {
            poster_base: poster_base.into(),
            backdrop_base: backdrop_base.into(),
        }
    }

    pub fn from_config(config: &TmdbConfig) -> Self {
        Self::new(config.poster_base_url.clone(), config.image_base_url.clone())
    }

    /// Poster size (`w500` by default).
    pub fn poster(&self, path: Option<&str>) -> Option<String> {
        join(&self.poster_base, path)
    }

    /// Full-size backdrop.
    pub fn backdrop(&self, path: Option<&str>) -> Option<String> {
        join(&self.backdrop_base, path)
    }

    /// Studio logos use the `w300` size.
    pub fn logo(&self, path: Option<&str>) -> Option<String> {
        let base = match self.poster_base.rsplit_once('/') {
            Some((prefix, _size)) => format!("{}/w300", prefix),
            None => self.poster_base.clone(),
        };
        join(&base, path)
    }
}

impl Default for ImageUrls {
    fn default() -> Self {
        Self::from_config(&TmdbConfig::default())
    }
}

fn join(base: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let sep = if path.starts_with('/') { "" } else { "/" };
    Some(format!("{}{}{}", base.trim_end_matches('/'), sep, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let urls = ImageUrls::default();
        assert_eq!(
            urls.poster(Some("/x.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/x.jpg")
        );
        assert_eq!(
            urls.backdrop(Some("/b.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/original/b.jpg")
        );
        assert_eq!(
            urls.logo(Some("/l.png")).as_deref(),
            Some("https://image.tmdb.org/t/p/w300/l.png")
        );
        assert_eq!(urls.poster(None), None);
        assert_eq!(urls.poster(Some("")), None);
    }
}
