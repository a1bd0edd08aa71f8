//! Fixed-latency memory controller.

use simt_core::core::pipeline::latch::Latch;
use simt_core::soc::interconnect::{
    MemReply, MemRequest, MemResponse, Source, TaggedRequest,
};
use simt_core::soc::{MemController, Memory};

struct Bench {
    ctrl: MemController,
    input: Latch<TaggedRequest>,
    output: Latch<MemResponse>,
    memory: Memory,
}

impl Bench {
    fn new(latency: u64) -> Self {
        Self {
            ctrl: MemController::new(latency),
            input: Latch::new("mem_req"),
            output: Latch::new("mem_resp"),
            memory: Memory::new(),
        }
    }

    fn request(&mut self, src: Source, req: MemRequest) {
        self.input.send(TaggedRequest { src, req });
    }

    /// Cycles until a response appears, consuming it.
    fn wait(&mut self) -> (u64, MemResponse) {
        for cycle in 1..=100 {
            let _ = self.ctrl.tick(&mut self.input, &mut self.output, &mut self.memory);
            if let Some(resp) = self.output.pop() {
                return (cycle, resp);
            }
        }
        panic!("no response within 100 cycles");
    }
}

#[test]
fn read_completes_after_the_latency() {
    let mut b = Bench::new(5);
    b.memory.write_word(0x1004, 0xCAFE);
    b.request(Source::ICache, MemRequest::read(0x1000, 2));
    let (cycles, resp) = b.wait();
    assert_eq!(cycles, 6);
    assert_eq!(
        resp,
        MemResponse {
            src: Source::ICache,
            addr: 0x1000,
            reply: MemReply::Data(vec![0, 0xCAFE]),
        }
    );
    assert!(b.ctrl.is_idle());
}

#[test]
fn write_is_applied_on_completion() {
    let mut b = Bench::new(3);
    b.request(Source::DCache, MemRequest::write(0x1000_0000, vec![1, 2]));
    let activity = b.ctrl.tick(&mut b.input, &mut b.output, &mut b.memory);
    assert!(activity.accepted);
    assert_eq!(b.memory.read_word(0x1000_0004), 0);

    let (_, resp) = b.wait();
    assert_eq!(resp.reply, MemReply::WriteDone);
    assert_eq!(b.memory.read_word(0x1000_0004), 2);
}

#[test]
fn requests_overlap_and_finish_in_order() {
    let mut b = Bench::new(4);
    b.request(Source::ICache, MemRequest::read(0x1000, 1));
    let _ = b.ctrl.tick(&mut b.input, &mut b.output, &mut b.memory);
    b.request(Source::DCache, MemRequest::read(0x1000_0000, 1));
    let _ = b.ctrl.tick(&mut b.input, &mut b.output, &mut b.memory);
    assert_eq!(b.ctrl.in_flight(), 2);

    let (_, first) = b.wait();
    let (gap, second) = b.wait();
    assert_eq!(first.src, Source::ICache);
    assert_eq!(second.src, Source::DCache);
    assert_eq!(gap, 1);
}

#[test]
fn blocked_output_stalls_completion() {
    let mut b = Bench::new(1);
    b.output.send(MemResponse {
        src: Source::ICache,
        addr: 0,
        reply: MemReply::WriteDone,
    });
    b.request(Source::DCache, MemRequest::read(0x1000_0000, 1));
    let _ = b.ctrl.tick(&mut b.input, &mut b.output, &mut b.memory);
    let activity = b.ctrl.tick(&mut b.input, &mut b.output, &mut b.memory);
    assert!(activity.stalled);
    assert_eq!(b.ctrl.in_flight(), 1);
}
