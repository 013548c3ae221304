//! Plain-text rendering for command results.

#[cfg(test)]
#[path = "output_test.rs"]
mod output_test;

use nanolink::UserProfile;
use nanolink::analytics;
use nanolink::links::{self, Pager};
use nanolink::types::{DashboardStats, LinkAnalytics, ShortLink};

pub fn user_line(user: &UserProfile) -> String {
    if user.name.is_empty() {
        format!("{} ({})", user.email, user.id)
    } else {
        format!("{} <{}> ({})", user.name, user.email, user.id)
    }
}

pub fn link_line(public_base: &str, link: &ShortLink) -> String {
    format!(
        "{id}\t{short}\t{clicks} clicks\t{original}",
        id = link.id,
        short = links::share_url(public_base, link.code()),
        clicks = link.clicks,
        original = link.original_url,
    )
}

pub fn dashboard_lines(public_base: &str, stats: &DashboardStats, pager: &Pager) -> Vec<String> {
    let mut lines = vec![format!(
        "links: {}  clicks: {}  top source: {}",
        stats.total_links,
        stats.total_clicks,
        stats.top_source().filter(|s| !s.is_empty()).unwrap_or("N/A"),
    )];
    if stats.links.is_empty() {
        lines.push("No links yet".to_owned());
    } else {
        lines.extend(stats.links.iter().map(|link| link_line(public_base, link)));
    }
    lines.push(format!("page {} of {}", pager.page, pager.total_pages));
    lines
}

pub fn analytics_lines(public_base: &str, data: &LinkAnalytics) -> Vec<String> {
    let details = &data.url_details;
    let mut lines = vec![
        format!("{} -> {}", links::share_url(public_base, details.code()), details.original_url),
        format!("total clicks: {}", details.clicks),
        "clicks (last 7 days):".to_owned(),
    ];
    lines.extend(data.click_history.iter().map(|point| format!("  {}  {}", point.date, point.clicks)));

    lines.push("recent activity:".to_owned());
    if data.recent_clicks.is_empty() {
        lines.push("  No visits yet".to_owned());
    }
    for click in &data.recent_clicks {
        let date = analytics::click_date(click).unwrap_or("-");
        lines.push(format!("  {date}  {}", analytics::recent_click_label(click)));
    }

    lines.push("devices:".to_owned());
    for share in analytics::device_breakdown(&data.recent_clicks) {
        lines.push(format!("  {:<10} {:>3}%  ({})", share.device, share.percent, share.count));
    }

    if let Some(pagination) = &data.pagination {
        lines.push(format!(
            "page {} of {} ({} visits)",
            pagination.page, pagination.total_pages, pagination.total
        ));
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
