//! Tables for human output.

use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use fudidoflix_core::catalog::Row;
use fudidoflix_core::episodes::EpisodeRow;
use fudidoflix_core::DetailsView;
use fudidoflix_models::{InboxNotification, PosterEntry, RouletteItem, WatchedEpisodeMark};
use fudidoflix_tmdb::{Company, Genre, MediaItem, Person};
use owo_colors::OwoColorize;

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn section(title: &str) -> String {
    format!("\n{}", title.bright_cyan().bold())
}

fn kind_label(item: &MediaItem) -> String {
    item.kind().map(|k| k.to_string()).unwrap_or_else(|| "-".to_string())
}

fn year_label(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn media_items(items: &[MediaItem]) -> Table {
    let mut t = table(&["ID", "Tipo", "Título", "Ano", "Nota"]);
    for item in items {
        t.add_row(vec![
            Cell::new(item.id),
            Cell::new(kind_label(item)),
            Cell::new(item.display_title()),
            Cell::new(year_label(item.year())),
            Cell::new(if item.vote_average > 0.0 {
                format!("{:.1}", item.vote_average)
            } else {
                "-".to_string()
            }),
        ]);
    }
    t
}

pub fn home_row(row: &Row, limit: usize) -> Table {
    let shown: Vec<MediaItem> = row.items.iter().take(limit).cloned().collect();
    media_items(&shown)
}

pub fn poster_entries(entries: &[PosterEntry]) -> Table {
    let mut t = table(&["#", "ID", "Tipo", "Título"]);
    for (i, entry) in entries.iter().enumerate() {
        t.add_row(vec![
            Cell::new(i + 1),
            Cell::new(entry.id),
            Cell::new(entry.kind),
            Cell::new(&entry.title),
        ]);
    }
    t
}

pub fn watched_marks(marks: &[WatchedEpisodeMark]) -> Table {
    let mut t = table(&["ID", "Tipo", "Temporada", "Episódio", "Em"]);
    for mark in marks {
        t.add_row(vec![
            Cell::new(mark.id),
            Cell::new(mark.kind),
            Cell::new(mark.season.map(|s| s.to_string()).unwrap_or_default()),
            Cell::new(mark.episode.map(|e| e.to_string()).unwrap_or_default()),
            Cell::new(mark.watched_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    t
}

pub fn episodes(rows: &[EpisodeRow]) -> Table {
    let mut t = table(&["", "Ep.", "Nome", "Duração", "Visto"]);
    for row in rows {
        let marker = if row.active { "▶" } else { "" };
        let mut name = Cell::new(&row.name);
        if row.active {
            name = name.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        t.add_row(vec![
            Cell::new(marker),
            Cell::new(format!("T{}E{}", row.season, row.episode)),
            name,
            Cell::new(row.runtime.map(|m| format!("{}min", m)).unwrap_or_default()),
            Cell::new(if row.watched { "✓" } else { "" }),
        ]);
    }
    t
}

pub fn details(view: &DetailsView) -> Table {
    let mut t = Table::new();
    t.load_preset(presets::UTF8_FULL);
    t.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    t.set_header(vec![
        Cell::new(&view.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(format!("{} {}", view.kind, view.id)),
    ]);
    let mut row = |label: &str, value: String| {
        t.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    };
    row("Relevância", view.relevance.clone());
    row("Ano", year_label(view.year));
    if let Some(length) = &view.length {
        row("Duração", length.clone());
    }
    row("Classificação", view.age_rating.clone());
    row("Gêneros", view.genres.clone());
    row("Elenco", view.cast.clone());
    row("Sinopse", view.overview.clone());
    row("Cenas e momentos", view.tags.clone());
    row("Minha lista", if view.in_my_list { "sim" } else { "não" }.to_string());
    if view.kind == fudidoflix_models::MediaKind::Movie {
        row("Assistido", if view.watched { "sim" } else { "não" }.to_string());
    }
    if let Some(trailer) = &view.trailer {
        row("Trailer", trailer.youtube_url());
    }
    t
}

pub fn inbox(items: &[InboxNotification]) -> Table {
    let mut t = table(&["ID", "Aviso", "Criado em"]);
    for item in items {
        t.add_row(vec![
            Cell::new(item.unique_id()),
            Cell::new(item.headline()),
            Cell::new(item.created_at().format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    t
}

pub fn roulette(items: &[RouletteItem]) -> Table {
    let mut t = table(&["#", "ID", "Tipo", "Título"]);
    for (i, item) in items.iter().enumerate() {
        t.add_row(vec![
            Cell::new(i + 1),
            Cell::new(item.id),
            Cell::new(item.media_type),
            Cell::new(item.wheel_label()),
        ]);
    }
    t
}

pub fn genres(genres: &[Genre]) -> Table {
    let mut t = table(&["ID", "Gênero"]);
    for genre in genres {
        t.add_row(vec![Cell::new(genre.id), Cell::new(&genre.name)]);
    }
    t
}

pub fn people(people: &[Person]) -> Table {
    let mut t = table(&["ID", "Nome", "Área"]);
    for person in people {
        t.add_row(vec![
            Cell::new(person.id),
            Cell::new(&person.name),
            Cell::new(person.known_for_department.clone().unwrap_or_default()),
        ]);
    }
    t
}

pub fn companies(companies: &[Company]) -> Table {
    let mut t = table(&["ID", "Estúdio", "País"]);
    for company in companies {
        t.add_row(vec![
            Cell::new(company.id),
            Cell::new(&company.name),
            Cell::new(company.origin_country.clone().unwrap_or_default()),
        ]);
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_table_has_row_per_item() {
        let items = vec![
            MediaItem {
                id: 1,
                title: Some("Filme".into()),
                release_date: Some("1999-03-31".into()),
                vote_average: 8.25,
                ..MediaItem::default()
            },
            MediaItem {
                id: 2,
                name: Some("Série".into()),
                ..MediaItem::default()
            },
        ];
        let rendered = media_items(&items).to_string();
        assert!(rendered.contains("Filme"));
        assert!(rendered.contains("1999"));
        assert!(rendered.contains("8.2") || rendered.contains("8.3"));
        assert!(rendered.contains("tv"));
    }
}
