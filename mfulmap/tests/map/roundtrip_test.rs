use crate::common::fixtures;

use mfulmap::SeekMode;
use mfulmap::test_support::{Harness, formatted_tag};
use proptest::prelude::*;

fn empty_after(prefix: &[u8]) -> Harness {
    let mut area = prefix.to_vec();
    area.extend_from_slice(&[0x03, 0x00, 0xFE]);
    let mut h = Harness::new(formatted_tag(fixtures::LARGE, &area));
    h.check().unwrap();
    h
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn write_check_read(
        data in proptest::collection::vec(any::<u8>(), 1..1600),
        layout in 0usize..5,
    ) {
        let prefixes = fixtures::prefixes();
        let prefix = &prefixes[layout];
        let mut h = empty_after(prefix);
        let written = h.write(&data, SeekMode::Begin).unwrap();
        prop_assert_eq!(written, data.len());
        prop_assert_eq!(h.check().unwrap(), data.len());
        prop_assert_eq!(h.read_all().unwrap(), data);

        let tag = h.mock.tag();
        prop_assert_eq!(&tag.memory()[16..16 + prefix.len()], &prefix[..]);
    }

    #[test]
    fn chunked_writes_read_back_whole(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 1..12), 1..20),
    ) {
        let mut h = empty_after(&fixtures::lock_control_tlv());
        let mut expected = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if expected.len() + chunk.len() > 254 {
                break;
            }
            let seek = if i == 0 { SeekMode::Begin } else { SeekMode::Current };
            prop_assert_eq!(h.write(chunk, seek).unwrap(), chunk.len());
            expected.extend_from_slice(chunk);
        }
        prop_assert_eq!(h.check().unwrap(), expected.len());

        let mut out = h.read(5, SeekMode::Begin).unwrap();
        while out.len() < expected.len() {
            out.extend(h.read(5, SeekMode::Current).unwrap());
        }
        prop_assert_eq!(out, expected);
    }
}
