use super::*;
use nanolink::types::{ClickEvent, ClickPoint, Pagination};

const BASE: &str = "http://sho.rt";

fn link(id: &str, alias: &str, clicks: u64) -> ShortLink {
    ShortLink {
        id: id.to_owned(),
        alias: Some(alias.to_owned()),
        original_url: format!("https://example.com/{id}"),
        clicks,
        ..ShortLink::default()
    }
}

#[test]
fn user_line_falls_back_to_email_without_name() {
    let user = UserProfile { id: "u1".to_owned(), email: "a@b.c".to_owned(), ..UserProfile::default() };
    assert_eq!(user_line(&user), "a@b.c (u1)");

    let named = UserProfile { name: "Ada".to_owned(), ..user };
    assert_eq!(user_line(&named), "Ada <a@b.c> (u1)");
}

#[test]
fn link_line_shows_share_url_and_clicks() {
    let line = link_line(BASE, &link("l1", "docs", 4));
    assert_eq!(line, "l1\thttp://sho.rt/docs\t4 clicks\thttps://example.com/l1");
}

#[test]
fn dashboard_lines_report_empty_state_and_page() {
    let stats = DashboardStats {
        total_links: 0,
        total_clicks: 0,
        links: Vec::new(),
        total_pages: 1,
        current_page: Some(1),
        breakdowns: None,
    };
    let pager = Pager::new(10);
    let lines = dashboard_lines(BASE, &stats, &pager);
    assert_eq!(lines[0], "links: 0  clicks: 0  top source: N/A");
    assert_eq!(lines[1], "No links yet");
    assert_eq!(lines[2], "page 1 of 1");
}

#[test]
fn analytics_lines_include_history_visits_and_devices() {
    let data = LinkAnalytics {
        url_details: link("l1", "docs", 2),
        click_history: vec![ClickPoint { date: "2024-03-01".to_owned(), clicks: 2 }],
        recent_clicks: vec![
            ClickEvent {
                browser: "Chrome".to_owned(),
                os: "Mac OS".to_owned(),
                device: Some("Desktop".to_owned()),
                created_at: Some("2024-03-01T10:00:00Z".to_owned()),
                ..ClickEvent::default()
            },
            ClickEvent { browser: "Safari".to_owned(), os: "iOS".to_owned(), ..ClickEvent::default() },
        ],
        pagination: Some(Pagination { page: 1, limit: 10, total_pages: 1, total: 2 }),
    };
    let lines = analytics_lines(BASE, &data);
    assert_eq!(lines[0], "http://sho.rt/docs -> https://example.com/l1");
    assert!(lines.contains(&"  2024-03-01  2".to_owned()));
    assert!(lines.contains(&"  2024-03-01  Chrome on Mac".to_owned()));
    assert!(lines.contains(&"  -  Safari on iOS".to_owned()));
    assert!(lines.iter().any(|l| l.contains("Unknown") && l.contains("50%")));
    assert_eq!(lines.last().map(String::as_str), Some("page 1 of 1 (2 visits)"));
}
