//! Paging predicate state carried across request/response round trips.

use hazelcast_client::query::{IterationType, PagingPredicate, Predicate, Predicates};
use hazelcast_protocol::protocol::builtin::{DataCodec, EntryListCodec, StringCodec};
use hazelcast_protocol::protocol::codecs::{
    MapEntriesWithPagingPredicateCodec, MapKeySetWithPagingPredicateCodec, Operation,
    ResponseBuilder,
};
use hazelcast_protocol::protocol::custom::{
    AnchorDataListHolder, AnchorDataListHolderCodec, PagingPredicateHolder,
    PagingPredicateHolderCodec,
};
use hazelcast_protocol::protocol::ClientMessage;
use hazelcast_protocol::{Data, ToData};

fn decode_paging_request(msg: &ClientMessage) -> (String, PagingPredicateHolder) {
    let mut cursor = msg.cursor();
    cursor.next().unwrap();
    let name = StringCodec::decode(&mut cursor).unwrap();
    let holder = PagingPredicateHolderCodec::decode(&mut cursor).unwrap();
    (name, holder)
}

fn entries_response(entries: &[(Data, Data)], anchors: &AnchorDataListHolder) -> ClientMessage {
    let mut msg =
        ResponseBuilder::response(MapEntriesWithPagingPredicateCodec::RESPONSE_TYPE).build();
    EntryListCodec::encode(
        &mut msg,
        entries.iter().map(|(k, v)| (k, v)),
        DataCodec::encode,
        DataCodec::encode,
    );
    AnchorDataListHolderCodec::encode(&mut msg, anchors);
    msg
}

#[test]
fn test_holder_round_trip_preserves_anchor_order() {
    let adults = Predicates::greater_equal("age", &18i32).unwrap();
    let mut predicate: PagingPredicate<String, i32> =
        PagingPredicate::with_predicate(adults, 2).unwrap();
    predicate.set_anchor_list(vec![
        (1, ("zed".to_string(), 99)),
        (0, ("amy".to_string(), 18)),
    ]);
    predicate.set_page(2).unwrap();

    let holder = predicate.to_holder().unwrap();
    let request = MapEntriesWithPagingPredicateCodec::encode_request("people", &holder);
    let (name, decoded) = decode_paging_request(&request);

    assert_eq!(name, "people");
    assert_eq!(decoded, holder);
    assert_eq!(decoded.anchor_data_list_holder.anchor_page_list, vec![1, 0]);
    assert_eq!(
        decoded.anchor_data_list_holder.anchor_data_list,
        vec![
            ("zed".to_data().unwrap(), 99i32.to_data().unwrap()),
            ("amy".to_data().unwrap(), 18i32.to_data().unwrap()),
        ]
    );
    assert_eq!(
        decoded.predicate_data,
        Some(Predicates::greater_equal("age", &18i32).unwrap().to_data().unwrap())
    );
    assert!(decoded.partition_key_data.is_none());
}

#[test]
fn test_paging_session() {
    let mut predicate: PagingPredicate<String, i32> =
        PagingPredicate::with_predicate(Predicates::sql("age > 20"), 2).unwrap();

    // First page: no anchors yet.
    let holder = predicate.to_holder().unwrap();
    assert_eq!(holder.page, 0);
    assert!(holder.anchor_data_list_holder.anchor_page_list.is_empty());
    let request = MapEntriesWithPagingPredicateCodec::encode_request("people", &holder);
    assert!(request.is_retryable());

    let page: Vec<(Data, Data)> = vec![
        ("ann".to_data().unwrap(), 21i32.to_data().unwrap()),
        ("ben".to_data().unwrap(), 25i32.to_data().unwrap()),
    ];
    let anchors = AnchorDataListHolder {
        anchor_page_list: vec![0],
        anchor_data_list: vec![page[1].clone()],
    };
    let response =
        MapEntriesWithPagingPredicateCodec::decode_response(&entries_response(&page, &anchors))
            .unwrap();
    assert_eq!(response.items, page);
    predicate.update_anchors(&response.anchor_data_list).unwrap();
    assert_eq!(predicate.anchor_list(), &[(0, ("ben".to_string(), 25))]);

    // Second page sends the anchor of the first.
    assert_eq!(predicate.next_page(), 1);
    let (_, decoded) = decode_paging_request(&MapEntriesWithPagingPredicateCodec::encode_request(
        "people",
        &predicate.to_holder().unwrap(),
    ));
    assert_eq!(decoded.page, 1);
    assert_eq!(decoded.anchor_data_list_holder, anchors);

    // Reuse for a key query.
    predicate.reset();
    predicate.set_iteration_type(IterationType::Key);
    let (_, decoded) = decode_paging_request(&MapKeySetWithPagingPredicateCodec::encode_request(
        "people",
        &predicate.to_holder().unwrap(),
    ));
    assert_eq!(decoded.page, 0);
    assert_eq!(decoded.iteration_type_id, IterationType::Key.id());
    assert!(decoded.anchor_data_list_holder.anchor_data_list.is_empty());
}

#[test]
fn test_navigation_scenario() {
    let mut predicate: PagingPredicate<String, String> = Predicates::paging(10).unwrap();
    for _ in 0..4 {
        predicate.next_page();
    }
    assert_eq!(predicate.page(), 4);
    assert_eq!(predicate.previous_page(), 3);
    assert!(predicate.set_page(-3).is_err());
    assert_eq!(predicate.page(), 3);
}

#[test]
fn test_construction_errors() {
    assert!(Predicates::paging::<String, String>(0).is_err());
    let inner: PagingPredicate<String, String> = Predicates::paging(5).unwrap();
    assert!(Predicates::paging_with::<String, String, _>(inner, 5).is_err());
}
