use crate::common::{self, fixtures};

use mfulmap::config::MapConfig;
use mfulmap::protocol::Command;
use mfulmap::test_support::{Harness, empty_ndef_tag, formatted_tag, ndef_tag, payload, tag_with_cc};
use mfulmap::{CardState, Error, LengthForm, Operation, SeekMode};

#[test]
fn empty_container_is_initialized() {
    common::init_logger();
    let mut h = Harness::new(empty_ndef_tag(fixtures::SMALL));
    assert_eq!(h.check().unwrap(), 0);
    assert_eq!(h.map.card_state(), CardState::Initialized);
    assert_eq!(h.map.card_memory_size(), 48);

    let info = h.map.ndef_info().unwrap();
    assert_eq!((info.sector, info.block, info.byte), (0, 4, 2));
    assert_eq!(info.length, 0);
    assert_eq!(info.length_form, LengthForm::Short);
    assert_eq!(info.free_size, 46);
    assert_eq!(info.card_state, CardState::Initialized);
}

#[test]
fn check_reads_cc_then_first_window() {
    let mut h = Harness::new(ndef_tag(fixtures::SMALL, &[], &payload(10)));
    assert_eq!(h.check().unwrap(), 10);
    assert_eq!(h.map.card_state(), CardState::ReadWrite);

    let tag = h.mock.tag();
    assert_eq!(tag.sent.len(), 2);
    assert_eq!(tag.sent[0].command, Command::Read { block: 3 });
    assert_eq!(tag.sent[1].command, Command::Read { block: 4 });
}

#[test]
fn control_tlvs_are_skipped() {
    let mut h = Harness::new(ndef_tag(fixtures::SMALL, &fixtures::control_tlvs(), &payload(8)));
    assert_eq!(h.check().unwrap(), 8);
    let info = h.map.ndef_info().unwrap();
    assert_eq!((info.sector, info.block, info.byte), (0, 7, 0));
    assert_eq!(info.free_size, 48 - 12 - 8);
}

#[test]
fn repeated_check_is_idempotent() {
    let mut h = Harness::new(ndef_tag(fixtures::SMALL, &fixtures::lock_control_tlv(), &payload(20)));
    let first = h.check().unwrap();
    let info = h.map.ndef_info();
    let state = h.map.card_state();

    assert_eq!(h.check().unwrap(), first);
    assert_eq!(h.map.ndef_info(), info);
    assert_eq!(h.map.card_state(), state);
    assert_eq!(
        h.completions.borrow().len(),
        0,
        "settle() consumes each completion"
    );
}

#[test]
fn wrong_magic_is_rejected() {
    let mut h = Harness::new(tag_with_cc([0xE2, 0x10, 0x06, 0x00], &[0x03, 0x00, 0xFE]));
    assert!(matches!(h.check(), Err(Error::NoNdefSupport)));
    assert_eq!(h.map.card_state(), CardState::Invalid);
    // no TLV scan after a bad CC
    assert_eq!(h.sent(), 1);
}

#[test]
fn unknown_access_byte_is_rejected() {
    let mut h = Harness::new(tag_with_cc([0xE1, 0x10, 0x06, 0x05], &[0x03, 0x00, 0xFE]));
    assert!(matches!(h.check(), Err(Error::NoNdefSupport)));
    assert_eq!(h.map.card_state(), CardState::Invalid);
}

#[test]
fn unsupported_mapping_version_is_rejected() {
    for version in [0x00, 0x20] {
        let mut h = Harness::new(tag_with_cc([0xE1, version, 0x06, 0x00], &[0x03, 0x00, 0xFE]));
        assert!(matches!(h.check(), Err(Error::InvalidFormat(_))));
        assert_eq!(h.map.card_state(), CardState::Invalid);
    }
}

#[test]
fn read_only_tag() {
    let message = payload(12);
    let mut area = mfulmap::test_support::ndef_tlv(&message);
    area.push(0xFE);
    let mut h = Harness::new(tag_with_cc([0xE1, 0x10, 0x06, 0x0F], &area));
    assert_eq!(h.check().unwrap(), 12);
    assert_eq!(h.map.card_state(), CardState::ReadOnly);
    assert_eq!(h.read_all().unwrap(), message);
    assert!(matches!(
        h.map.write_ndef(&[1, 2, 3], SeekMode::Begin),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn read_only_empty_container_has_no_ndef() {
    let mut h = Harness::new(tag_with_cc([0xE1, 0x10, 0x06, 0x0F], &[0x03, 0x00, 0xFE]));
    assert!(matches!(h.check(), Err(Error::NoNdefSupport)));
    assert_eq!(h.map.card_state(), CardState::Invalid);
}

#[test]
fn terminator_before_ndef() {
    let mut h = Harness::new(formatted_tag(fixtures::SMALL, &[0x00, 0xFE, 0x03, 0x00]));
    assert!(matches!(h.check(), Err(Error::NoNdefSupport)));
    assert_eq!(h.map.card_state(), CardState::Invalid);
}

#[test]
fn length_beyond_container() {
    let mut h = Harness::new(formatted_tag(fixtures::SMALL, &[0x03, 0x40]));
    assert!(matches!(h.check(), Err(Error::NoNdefSupport)));
}

#[test]
fn short_cc_reply_is_a_length_error() {
    let mut tag = empty_ndef_tag(fixtures::SMALL);
    tag.override_reply(0, vec![0xE1, 0x10, 0x06, 0x00]);
    let mut h = Harness::new(tag);
    match h.check() {
        Err(Error::InvalidReceiveLength { expected, actual }) => {
            assert_eq!((expected, actual), (16, 4));
        }
        other => panic!("expected InvalidReceiveLength, got {:?}", other),
    }
    assert_eq!(h.map.card_state(), CardState::Invalid);
}

#[test]
fn lock_bits_make_the_tag_read_only() {
    let config = MapConfig::new().with_lock_bits_check(true);

    let mut tag = ndef_tag(fixtures::SMALL, &[], &payload(5));
    tag.memory_mut()[10..12].copy_from_slice(&[0xF0, 0x00]);
    let mut h = Harness::with_config(tag, config);
    assert_eq!(h.check().unwrap(), 5);
    assert_eq!(h.map.card_state(), CardState::ReadOnly);
    assert_eq!(h.mock.tag().sent[0].command, Command::Read { block: 2 });

    let mut h = Harness::with_config(ndef_tag(fixtures::SMALL, &[], &payload(5)), config);
    h.check().unwrap();
    assert_eq!(h.map.card_state(), CardState::ReadWrite);
}

#[test]
fn failed_check_keeps_state_when_configured() {
    let mut tag = ndef_tag(fixtures::SMALL, &[], &payload(5));
    // first check uses requests 0 and 1
    tag.fail_request(2);
    let config = MapConfig::new().with_invalidate_on_check_failure(false);
    let mut h = Harness::with_config(tag, config);
    h.check().unwrap();
    assert!(matches!(h.check(), Err(Error::Timeout)));
    assert_eq!(h.map.card_state(), CardState::ReadWrite);
}

#[test]
fn failed_check_invalidates_by_default() {
    let mut tag = ndef_tag(fixtures::SMALL, &[], &payload(5));
    tag.fail_request(2);
    let mut h = Harness::new(tag);
    h.check().unwrap();
    assert!(matches!(h.check(), Err(Error::Timeout)));
    assert_eq!(h.map.card_state(), CardState::Invalid);
}

#[test]
fn completion_reports_the_check_operation() {
    let mut h = Harness::new(ndef_tag(fixtures::SMALL, &[], &payload(3)));
    h.map.check_ndef().unwrap();
    h.run();
    let done = h.completions.borrow();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].0, Operation::Check);
    assert_eq!(*done[0].1.as_ref().unwrap(), 3);
}
