//! A scripted stand-in for the kernel side of a routing socket.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use super::error::Result;
use super::message::{NLM_F_CAPPED, NLMSG_HDRLEN, NlMsgHdr, NlMsgType, nlmsg_align};
use super::socket::Transport;

type Script = Box<dyn Fn(&NlMsgHdr) -> Vec<Vec<u8>> + Send + Sync>;

/// Answers each sent request with the datagrams its script returns.
pub struct ScriptedKernel {
    port_id: u32,
    seq: AtomicU32,
    script: Script,
    sent: Mutex<Vec<Vec<u8>>>,
    queue: Mutex<VecDeque<Vec<u8>>>,
}

impl ScriptedKernel {
    pub fn new(script: impl Fn(&NlMsgHdr) -> Vec<Vec<u8>> + Send + Sync + 'static) -> Self {
        Self {
            port_id: 4000,
            seq: AtomicU32::new(1),
            script: Box::new(script),
            sent: Mutex::new(Vec::new()),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn acking() -> Self {
        Self::new(|req| vec![error_reply(req.nlmsg_seq, req.nlmsg_pid, 0)])
    }

    pub fn rejecting(errno: i32) -> Self {
        Self::new(move |req| vec![error_reply(req.nlmsg_seq, req.nlmsg_pid, -errno)])
    }

    pub fn silent() -> Self {
        Self::new(|_| Vec::new())
    }

    /// Every message sent so far.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedKernel {
    fn port_id(&self) -> u32 {
        self.port_id
    }

    fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    async fn send(&self, msg: &[u8]) -> Result<()> {
        let header = *NlMsgHdr::from_bytes(msg)?;
        self.sent.lock().unwrap().push(msg.to_vec());
        self.queue.lock().unwrap().extend((self.script)(&header));
        Ok(())
    }

    async fn recv_msg(&self) -> Result<Vec<u8>> {
        let next = self.queue.lock().unwrap().pop_front();
        match next {
            Some(datagram) => Ok(datagram),
            None => std::future::pending().await,
        }
    }
}

/// Build one message with the given header fields and payload.
pub fn reply(msg_type: u16, seq: u32, pid: u32, payload: &[u8]) -> Vec<u8> {
    let mut header = NlMsgHdr::new(msg_type, 0);
    header.nlmsg_len = (NLMSG_HDRLEN + payload.len()) as u32;
    header.nlmsg_seq = seq;
    header.nlmsg_pid = pid;

    let mut msg = header.as_bytes().to_vec();
    msg.extend_from_slice(payload);
    msg.resize(nlmsg_align(msg.len()), 0);
    msg
}

/// Build an `NLMSG_ERROR` reply echoing a capped request header.
pub fn error_reply(seq: u32, pid: u32, code: i32) -> Vec<u8> {
    let mut echoed = NlMsgHdr::new(NlMsgType::RTM_SETLINK, 0);
    echoed.nlmsg_len = 40;
    echoed.nlmsg_seq = seq;
    echoed.nlmsg_pid = pid;

    let mut payload = code.to_ne_bytes().to_vec();
    payload.extend_from_slice(echoed.as_bytes());

    let mut msg = reply(NlMsgType::ERROR, seq, pid, &payload);
    msg[6..8].copy_from_slice(&NLM_F_CAPPED.to_ne_bytes());
    msg
}
