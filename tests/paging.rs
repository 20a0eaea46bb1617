use rstest::rstest;
use tbed::{ControlHeader, Message, NmError};

fn decoded(msg: &Message) -> Vec<String> {
    msg.pages()
        .iter()
        .map(|p| serde_json::from_str(p).unwrap())
        .collect()
}

#[rstest]
#[case("a", 1)]
#[case("hello", 5)]
#[case("hello", 1)]
#[case("hello", 2)]
#[case("héllo wörld 🌍🌍", 3)]
#[case("line one\nline \"two\"\t\\ end", 4)]
#[case("日本語のメール本文です", 5)]
#[case("--tbed-hdr\nsee below", 524_288)]
#[case("--tbed-hdr\nPages: 3", 524_288)]
#[case("--tbed-hdr\nPages: 2", 4)]
#[case("--tbed-hdr\nCommand: vim", 524_288)]
fn plaintext_survives_paging(#[case] text: &str, #[case] limit: usize) {
    let msg = Message::from_plaintext(text, limit).unwrap();
    assert_eq!(msg.to_plaintext().unwrap(), text);
}

#[rstest]
#[case(1, 4, 1)]
#[case(4, 4, 1)]
#[case(5, 4, 2)]
#[case(8, 4, 2)]
#[case(9, 4, 3)]
#[case(1_000_000, 524_288, 2)]
fn page_count_is_ceiling_of_chars_over_limit(
    #[case] chars: usize,
    #[case] limit: usize,
    #[case] expected: usize,
) {
    let text = "z".repeat(chars);
    let msg = Message::from_plaintext(&text, limit).unwrap();
    assert_eq!(msg.page_count(), expected);
}

#[test]
fn short_text_is_one_page_without_header() {
    let msg = Message::from_plaintext("hello", 524_288).unwrap();
    assert_eq!(msg.page_count(), 1);
    assert!(!msg.has_control_header());
    assert_eq!(msg.pages(), ["\"hello\"".to_string()]);
}

#[test]
fn text_at_exact_limit_needs_no_header() {
    let msg = Message::from_plaintext("abcd", 4).unwrap();
    assert_eq!(msg.pages().len(), 1);
}

#[test]
fn long_text_gets_pages_header_first() {
    let msg = Message::from_plaintext("abcdefghij", 4).unwrap();
    let pages = decoded(&msg);
    assert_eq!(pages, vec!["--tbed-hdr\nPages: 3", "abcd", "efgh", "ij"]);

    let header = ControlHeader::parse(&pages[0]).unwrap().unwrap();
    assert_eq!(header.page_count().unwrap().unwrap(), msg.page_count());
    assert_eq!(msg.pages().len(), msg.page_count() + 1);
}

#[test]
fn pages_are_counted_in_chars_not_bytes() {
    // 6 chars, 18 bytes.
    let text = "語語語語語語";
    let msg = Message::from_plaintext(text, 3).unwrap();
    assert_eq!(msg.page_count(), 2);
    assert_eq!(decoded(&msg)[1..], ["語語語", "語語語"]);
}

#[test]
fn empty_text_is_an_error() {
    let err = Message::from_plaintext("", 10).unwrap_err();
    assert!(matches!(err, NmError::EmptyPayload));
}

#[test]
fn reassembly_tolerates_a_wrong_page_hint() {
    let pages = vec![
        serde_json::to_string("--tbed-hdr\nPages: 5").unwrap(),
        serde_json::to_string("ab").unwrap(),
        serde_json::to_string("cd").unwrap(),
    ];
    let msg = Message::from_pages(pages).unwrap();
    assert_eq!(msg.to_plaintext().unwrap(), "abcd");
}

#[test]
fn command_page_is_plain_content() {
    let page = serde_json::to_string("--tbed-hdr\nCommand: vim").unwrap();
    let msg = Message::from_pages(vec![page]).unwrap();
    assert_eq!(msg.page_count(), 1);
    assert!(!msg.has_control_header());
    assert_eq!(msg.to_plaintext().unwrap(), "--tbed-hdr\nCommand: vim");
}

#[test]
fn undecodable_page_is_malformed_json() {
    let msg = Message::from_pages(vec!["not json".to_string()]);
    assert!(matches!(msg.unwrap_err(), NmError::Json(_)));
}
