use chrono::{DateTime, Days, Local};
use rss::{ChannelBuilder, Guid, ItemBuilder};

use crate::error::Result;
use crate::{Movie, Theater};

/// Today shifted by `date_offset` days.
pub fn target_date(date_offset: i32) -> DateTime<Local> {
    let now = Local::now();
    let days = Days::new(u64::from(date_offset.unsigned_abs()));
    let shifted = if date_offset >= 0 {
        now.checked_add_days(days)
    } else {
        now.checked_sub_days(days)
    };
    shifted.unwrap_or(now)
}

fn item_description(movie: &Movie, theater: Option<&Theater>) -> String {
    let mut parts = Vec::new();

    if !movie.description.is_empty() {
        parts.push(movie.description.clone());
    }
    let details: Vec<&str> = [&movie.runtime, &movie.rating, &movie.genre]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .filter(|field| !field.is_empty())
        .collect();
    if !details.is_empty() {
        parts.push(details.join(" - "));
    }
    if let Some(ref director) = movie.director {
        parts.push(format!("Director: {}", director));
    }
    if let Some(ref cast) = movie.cast {
        parts.push(format!("Cast: {}", cast.join(", ")));
    }
    if let Some(theater) = theater {
        parts.push(format!("{} ({})", theater.name, theater.address));
    }
    if !movie.showtimes.is_empty() {
        parts.push(format!("Showtimes: {}", movie.showtimes.join(" ")));
    }
    for theater in &movie.theaters {
        parts.push(format!("{}: {}", theater.name, theater.showtimes.join(" ")));
    }
    if let Some(ref poster) = movie.poster_url {
        parts.push(format!("<img src=\"{}\" alt=\"Poster\" />", poster));
    }

    parts.join("<br/>\n")
}

fn item(movie: &Movie, theater: Option<&Theater>, pub_date: &str) -> rss::Item {
    let title = match theater {
        Some(theater) => format!("{} @ {}", movie.name, theater.name),
        None => movie.name.clone(),
    };
    let guid = match theater {
        Some(theater) => format!("{}:{}", theater.id, movie.id),
        None => movie.id.clone(),
    };

    let mut builder = ItemBuilder::default();
    builder.title(title);
    builder.description(item_description(movie, theater));
    builder.guid(Guid {
        value: guid,
        permalink: false,
    });
    builder.pub_date(pub_date.to_string());
    if let Some(link) = movie.imdb.as_ref().or(movie.trailer.as_ref()) {
        builder.link(link.clone());
    }
    builder.build()
}

fn channel(items: Vec<rss::Item>, title: &str, link: &str, description: &str) -> Result<String> {
    let channel = ChannelBuilder::default()
        .title(title)
        .link(link)
        .description(description)
        .items(items)
        .build();

    let mut buf = Vec::new();
    channel.write_to(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// RSS feed with one item per movie.
pub fn movies_rss(
    movies: &[Movie],
    channel_title: &str,
    channel_link: &str,
    date: DateTime<Local>,
) -> Result<String> {
    let pub_date = date.to_rfc2822();
    let items = movies.iter().map(|m| item(m, None, &pub_date)).collect();
    channel(
        items,
        channel_title,
        channel_link,
        &format!("Movies showing on {}", date.format("%A, %B %-d")),
    )
}

/// RSS feed with one item per movie per theater.
pub fn theaters_rss(
    theaters: &[Theater],
    channel_title: &str,
    channel_link: &str,
    date: DateTime<Local>,
) -> Result<String> {
    let pub_date = date.to_rfc2822();
    let items = theaters
        .iter()
        .flat_map(|t| t.movies.iter().map(move |m| (t, m)))
        .map(|(t, m)| item(m, Some(t), &pub_date))
        .collect();
    channel(
        items,
        channel_title,
        channel_link,
        &format!("Showtimes on {}", date.format("%A, %B %-d")),
    )
}
