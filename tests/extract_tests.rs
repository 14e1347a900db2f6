use chrono::NaiveDate;
use spectral::assert_that;

use panscrape::extract::{Patterns, harvest_festivals, is_observance, pick_first};
use panscrape::record::parse_day;
use panscrape::text::{normalize, visible_text};

macro_rules! assert_observances {
    (
        $(
            $test_name:ident : $name:expr => $expected:expr
        ),+ $(,)?
    ) => {
        $(
            #[test]
            fn $test_name() {
                assert_that(&is_observance($name)).is_equal_to($expected);
            }
        )+
    }
}

assert_observances![
    ekadashi_is_observance: "Shattila Ekadashi" => true,
    sankranti_is_observance: "Makara Sankranti" => true,
    puja_is_observance: "Lakshmi Puja" => true,
    amavas_is_observance: "Mauni Amavas" => true,
    diwali_is_not_observance: "Diwali" => false,
    chauth_is_not_observance: "Sakat Chauth" => false,
    pongal_is_not_observance: "Pongal" => false,
];

#[test]
fn normalize_collapses_whitespace_runs() {
    assert_that(&normalize("  Sunrise \t 06:42\n\n AM  ")).is_equal_to("Sunrise 06:42 AM".to_string());
}

#[test]
fn normalize_of_blank_input_is_empty() {
    assert_that(&normalize(" \t\n ")).is_equal_to(String::new());
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize("a \t b\n  c");
    let twice = normalize(&once);
    assert_that(&twice).is_equal_to(&once);
}

#[test]
fn visible_text_drops_script_style_and_noscript() {
    let html = "<html><head><style>.x { color: red; }</style>\
                <script>var panchangData = {};</script></head>\
                <body><p>Sunrise 06:42 AM</p><noscript>enable javascript</noscript></body></html>";
    assert_that(&visible_text(html)).is_equal_to("Sunrise 06:42 AM".to_string());
}

#[test]
fn sunrise_extracts_clock_token() {
    let patterns = Patterns::default();
    let text = "Panchang for the day Sunrise 06:42 AM Sunset 05:50 PM";
    assert_that(&pick_first(&patterns.sunrise, text)).is_equal_to(Some("06:42 AM".to_string()));
}

#[test]
fn sunrise_is_absent_without_a_token() {
    let patterns = Patterns::default();
    assert_that(&pick_first(&patterns.sunrise, "no timings on this page")).is_equal_to(None::<String>);
}

#[test]
fn moonrise_accepts_the_no_moonrise_literal() {
    let patterns = Patterns::default();
    let text = "Moonrise No Moonrise Moonset 10:45 AM";
    assert_that(&pick_first(&patterns.moonrise, text)).is_equal_to(Some("No Moonrise".to_string()));
}

#[test]
fn keyword_pass_harvests_capitalized_phrase() {
    let names = harvest_festivals("The festival of Makara Sankranti is celebrated across India.");
    assert_that(&names.contains("Makara Sankranti")).is_equal_to(true);
}

#[test]
fn label_pass_harvests_adjacent_name() {
    let names = harvest_festivals("Festival Pongal");
    assert_that(&names.contains("Pongal")).is_equal_to(true);
}

#[test]
fn label_pass_rejects_timing_boilerplate() {
    let names = harvest_festivals("Festival Sunrise and Sunset timings for the city");
    assert_that(&names.is_empty()).is_equal_to(true);
}

#[test]
fn label_pass_rejects_overlong_phrases() {
    let names = harvest_festivals("Festival one two three four five six seven eight nine");
    assert_that(&names.is_empty()).is_equal_to(true);
}

#[test]
fn timing_only_text_harvests_nothing() {
    let names = harvest_festivals("Sunrise 06:42 AM Sunset 05:50 PM");
    assert_that(&names.is_empty()).is_equal_to(true);
}

#[test]
fn harvest_is_deduplicated_and_sorted() {
    let text = "observed as Vijaya Ekadashi; also Annada Ekadashi and again Vijaya Ekadashi";
    let names: Vec<String> = harvest_festivals(text).into_iter().collect();
    assert_that(&names).is_equal_to(vec![
        "Annada Ekadashi".to_string(),
        "Vijaya Ekadashi".to_string(),
    ]);
}

#[test]
fn parse_day_assembles_full_record() {
    let day = NaiveDate::from_ymd_opt(2025, 1, 14).expect("valid test date");
    let html = "<html><head><script>var tracker = 1;</script></head><body>\
                <div>Sunrise 07:15 AM Sunset 05:46 PM</div>\
                <div>Moonrise 05:04 PM Moonset 07:12 AM</div>\
                <div>Tithi Pratipada.</div>\
                <div>The festival of Makara Sankranti is celebrated.</div>\
                </body></html>";

    let record = parse_day(&Patterns::default(), html, day);

    assert_that(&record.date).is_equal_to("2025-01-14".to_string());
    assert_that(&record.date_label).is_equal_to("January 14, 2025, Tuesday".to_string());
    assert_that(&record.weekday).is_equal_to("Tuesday".to_string());
    assert_that(&record.timings.sunrise).is_equal_to(Some("07:15 AM".to_string()));
    assert_that(&record.timings.moonset).is_equal_to(Some("07:12 AM".to_string()));
    assert_that(&record.panchang.tithi).is_equal_to(Some("Pratipada".to_string()));
    assert_that(&record.festivals.contains("Makara Sankranti")).is_equal_to(true);
}

#[test]
fn parse_day_tolerates_absent_fields() {
    let day = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid test date");
    let record = parse_day(
        &Patterns::default(),
        "<html><body><p>nothing of note today</p></body></html>",
        day,
    );

    assert_that(&record.date_label).is_equal_to("June 01, 2025, Sunday".to_string());
    assert_that(&record.timings.sunrise).is_equal_to(None::<String>);
    assert_that(&record.timings.moonrise).is_equal_to(None::<String>);
    assert_that(&record.panchang.tithi).is_equal_to(None::<String>);
    assert_that(&record.panchang.karana).is_equal_to(None::<String>);
    assert_that(&record.festivals.is_empty()).is_equal_to(true);
}
