use crate::entities::Tag;

// "amenity=cafe,tourism=museum" -> [(amenity, cafe), (tourism, museum)];
// tokens without '=' are dropped. Only the first tag is consumed by the
// pipeline.
pub fn parse_tags(input: &str) -> Vec<Tag> {
    input
        .split(',')
        .filter_map(|token| {
            let (key, value) = token.split_once('=')?;
            Some(Tag::new(key.trim(), value.trim()))
        })
        .collect()
}

#[test]
fn extracts_first_pair_regardless_of_trailing_pairs() {
    let tags = parse_tags("amenity=cafe,tourism=museum");
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0], Tag::new("amenity", "cafe"));
}

#[test]
fn drops_tokens_without_equals() {
    let tags = parse_tags("garbage,amenity=cafe,alsogarbage");
    assert_eq!(tags, vec![Tag::new("amenity", "cafe")]);
}

#[test]
fn splits_on_first_equals_only() {
    let tags = parse_tags("name=a=b");
    assert_eq!(tags, vec![Tag::new("name", "a=b")]);
}

#[test]
fn trims_whitespace() {
    let tags = parse_tags(" amenity = cafe ");
    assert_eq!(tags, vec![Tag::new("amenity", "cafe")]);
}

#[test]
fn empty_and_malformed_input_yield_nothing() {
    assert!(parse_tags("").is_empty());
    assert!(parse_tags("no-equals-here").is_empty());
    assert!(parse_tags(",,,").is_empty());
}
