use crate::common::fixtures;

use mfulmap::protocol::Command;
use mfulmap::test_support::{Harness, empty_ndef_tag, ndef_tag, payload};
use mfulmap::SeekMode;

#[test]
fn read_across_sectors_selects_once() {
    // value bytes 4..1504 straddle the boundary at 1008
    let message = payload(1500);
    let mut h = Harness::new(ndef_tag(fixtures::LARGE, &[], &message));
    assert_eq!(h.check().unwrap(), 1500);
    assert_eq!(h.selects_since(0), 0);

    let before = h.sent();
    assert_eq!(h.read_all().unwrap(), message);
    assert_eq!(h.selects_since(before), 1);
    assert_eq!(h.map.current_sector(), Some(1));
    assert_eq!(h.mock.tag().selected_sector(), 1);
}

#[test]
fn check_selects_sector_zero_again() {
    let message = payload(1500);
    let mut h = Harness::new(ndef_tag(fixtures::LARGE, &[], &message));
    h.check().unwrap();
    h.read_all().unwrap();

    let before = h.sent();
    assert_eq!(h.check().unwrap(), 1500);
    assert_eq!(h.selects_since(before), 1);
    assert_eq!(
        h.mock.tag().sent[before + 1].command,
        Command::SectorSelectTarget { sector: 0 }
    );
    assert_eq!(h.map.current_sector(), Some(0));
}

#[test]
fn scan_continues_in_the_next_sector() {
    // proprietary TLV pushes the NDEF header to 1005..1009, across the boundary
    let message = payload(300);
    let mut h = Harness::new(ndef_tag(
        fixtures::LARGE,
        &fixtures::proprietary_tlv(1001),
        &message,
    ));
    assert_eq!(h.check().unwrap(), 300);
    assert_eq!(h.selects_since(0), 1);

    let info = h.map.ndef_info().unwrap();
    assert_eq!((info.sector, info.block, info.byte), (1, 0, 1));
    assert_eq!(h.read_all().unwrap(), message);
}

#[test]
fn value_starting_at_the_end_of_sector_zero() {
    let message = payload(20);
    let mut h = Harness::new(ndef_tag(
        fixtures::LARGE,
        &fixtures::proprietary_tlv(1000),
        &message,
    ));
    assert_eq!(h.check().unwrap(), 20);
    let info = h.map.ndef_info().unwrap();
    assert_eq!((info.sector, info.block, info.byte), (0, 255, 2));

    let before = h.sent();
    assert_eq!(h.read_all().unwrap(), message);
    assert_eq!(h.selects_since(before), 1);
}

#[test]
fn write_across_sectors_rewrites_length_in_sector_zero() {
    let mut h = Harness::new(empty_ndef_tag(fixtures::LARGE));
    h.check().unwrap();

    let data = payload(1500);
    let before = h.sent();
    assert_eq!(h.write(&data, SeekMode::Begin).unwrap(), 1500);
    // into sector 1 for the tail, back to sector 0 for the length field
    assert_eq!(h.selects_since(before), 2);
    assert_eq!(h.map.current_sector(), Some(0));

    assert_eq!(h.check().unwrap(), 1500);
    assert_eq!(h.read_all().unwrap(), data);
}

#[test]
fn terminator_lands_in_sector_one() {
    // header 4 + 1004 bytes ends exactly at the boundary
    let mut h = Harness::new(empty_ndef_tag(fixtures::LARGE));
    h.check().unwrap();
    h.write(&payload(1004), SeekMode::Begin).unwrap();
    assert_eq!(h.mock.tag().memory()[1024], 0xFE);
    assert_eq!(h.check().unwrap(), 1004);
}

#[test]
fn message_filling_the_large_tag() {
    let mut h = Harness::new(empty_ndef_tag(fixtures::LARGE));
    h.check().unwrap();
    let capacity = h.map.card_memory_size() - 4;
    let data = payload(capacity + 10);
    assert_eq!(h.write(&data, SeekMode::Begin).unwrap(), capacity);
    assert!(h.map.is_read_write_complete());
    assert_eq!(h.check().unwrap(), capacity);
    assert_eq!(h.read_all().unwrap(), &data[..capacity]);
}
