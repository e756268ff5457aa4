use crate::common::fixtures;

use mfulmap::map::State;
use mfulmap::protocol::Command;
use mfulmap::test_support::{Harness, empty_ndef_tag, ndef_tag, payload};
use mfulmap::{Error, Operation, Progress, Result, SeekMode};

/// Feed replies until the outstanding request matches `stop`, then hand
/// back that request's reply unprocessed.
fn pump_until(h: &mut Harness, stop: impl Fn(&Command) -> bool) -> Result<Vec<u8>> {
    loop {
        let last = h
            .mock
            .tag()
            .sent
            .last()
            .map(|r| r.command)
            .expect("nothing sent");
        let reply = h.mock.take_reply().expect("no reply queued");
        if stop(&last) {
            return reply;
        }
        h.map.process(reply).unwrap();
        assert_ne!(h.map.state(), State::Idle, "finished before reaching the request");
    }
}

fn last_completion(h: &Harness) -> (Operation, Result<usize>) {
    h.completions.borrow_mut().pop().expect("no completion")
}

#[test]
fn transport_failure_is_not_retried() {
    let mut tag = empty_ndef_tag(fixtures::SMALL);
    tag.fail_request(0);
    let mut h = Harness::new(tag);
    assert!(matches!(h.check(), Err(Error::Timeout)));
    assert_eq!(h.sent(), 1);
    assert_eq!(h.map.state(), State::Idle);
}

#[test]
fn failure_is_reported_once() {
    let mut tag = ndef_tag(fixtures::SMALL, &[], &payload(40));
    tag.fail_request(3);
    let mut h = Harness::new(tag);
    h.check().unwrap();

    assert_eq!(h.map.read_ndef(64, SeekMode::Begin).unwrap(), Progress::Pending);
    h.run();
    assert_eq!(h.completions.borrow().len(), 1);
    let (op, result) = last_completion(&h);
    assert_eq!(op, Operation::Read);
    assert!(matches!(result, Err(Error::Timeout)));
    assert!(matches!(h.map.process(Ok(vec![])), Err(Error::InvalidDeviceRequest)));
}

#[test]
fn bad_sector_select_ack() {
    let message = payload(1500);
    let mut h = Harness::new(ndef_tag(fixtures::LARGE, &[], &message));
    h.check().unwrap();

    h.map.read_ndef(usize::MAX, SeekMode::Begin).unwrap();
    pump_until(&mut h, |c| matches!(c, Command::SectorSelectIntent)).unwrap();
    h.map.process(Ok(vec![0x05])).unwrap();

    let (_, result) = last_completion(&h);
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
    assert_eq!(h.map.current_sector(), None);
}

#[test]
fn lost_select_target_forces_a_new_select() {
    let message = payload(1500);
    let mut h = Harness::new(ndef_tag(fixtures::LARGE, &[], &message));
    h.check().unwrap();

    h.map.read_ndef(usize::MAX, SeekMode::Begin).unwrap();
    pump_until(&mut h, |c| matches!(c, Command::SectorSelectTarget { .. })).unwrap();
    h.map.process(Err(Error::Timeout)).unwrap();
    assert!(matches!(last_completion(&h).1, Err(Error::Timeout)));
    assert_eq!(h.map.current_sector(), None);

    // the tag did switch; the next check must select sector 0 explicitly
    let before = h.sent();
    assert_eq!(h.check().unwrap(), 1500);
    assert_eq!(h.selects_since(before), 1);
    assert_eq!(h.read_all().unwrap(), message);
}

#[test]
fn failed_write_reports_zero_bytes() {
    let mut h = Harness::new(empty_ndef_tag(fixtures::SMALL));
    h.check().unwrap();
    h.write(&payload(8), SeekMode::Begin).unwrap();
    assert_eq!(h.map.bytes_written(), 8);

    h.map.write_ndef(&payload(20), SeekMode::Begin).unwrap();
    pump_until(&mut h, |c| matches!(c, Command::Write { block: 6, .. })).unwrap();
    h.map.process(Ok(vec![0x00])).unwrap();

    let (op, result) = last_completion(&h);
    assert_eq!(op, Operation::Write);
    assert!(matches!(result, Err(Error::InvalidFormat(_))));
    assert_eq!(h.map.bytes_written(), 0);

    // a failed write cannot be continued
    assert_eq!(h.write(&[1, 2, 3], SeekMode::Current).unwrap(), 3);
    assert_eq!(h.check().unwrap(), 3);
}

#[test]
fn short_read_reply_aborts_the_scan() {
    let mut tag = ndef_tag(fixtures::SMALL, &[], &payload(4));
    tag.override_reply(1, vec![0x03; 15]);
    let mut h = Harness::new(tag);
    assert!(matches!(
        h.check(),
        Err(Error::InvalidReceiveLength {
            expected: 16,
            actual: 15
        })
    ));
}

#[test]
fn busy_while_a_command_is_outstanding() {
    let mut h = Harness::new(ndef_tag(fixtures::SMALL, &[], &payload(4)));
    h.check().unwrap();
    h.map.read_ndef(4, SeekMode::Begin).unwrap();
    assert!(matches!(
        h.map.write_ndef(&[1], SeekMode::Begin),
        Err(Error::InvalidDeviceRequest)
    ));
    h.run();
    assert_eq!(h.map.read_data(), &payload(4)[..]);
}
