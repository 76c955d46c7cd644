#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;

use hazelcast_protocol::protocol::builtin::ErrorsCodec;
use hazelcast_protocol::protocol::codecs::{
    ClientAddClusterViewListenerCodec, ClientAuthenticationCodec,
    MapEntriesWithPagingPredicateCodec, SqlExecuteCodec,
};
use hazelcast_protocol::protocol::ClientMessageReader;

fuzz_target!(|data: &[u8]| {
    let mut reader = ClientMessageReader::new();
    let mut buf = BytesMut::from(data);

    while let Ok(Some(msg)) = reader.read(&mut buf) {
        let _ = ErrorsCodec::decode(&msg);
        let _ = ClientAuthenticationCodec::decode_response(&msg);
        let _ = ClientAddClusterViewListenerCodec::decode_event(&msg);
        let _ = MapEntriesWithPagingPredicateCodec::decode_response(&msg);
        let _ = SqlExecuteCodec::decode_response(&msg);
    }
});
