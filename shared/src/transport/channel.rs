use smol::channel::{self, Receiver, Sender, TryRecvError, TrySendError};

use super::{PacketReceiver, PacketSender, TransportError};

/// In-process transport: an unbounded channel carrying whole messages
pub struct PacketChannel;

impl PacketChannel {
    pub fn unbounded<M: Send + 'static>() -> (Box<dyn PacketSender<M>>, Box<dyn PacketReceiver<M>>)
    {
        let (sender, receiver) = channel::unbounded();
        let sender = PacketChannelSender { sender };
        let receiver = PacketChannelReceiver { receiver };
        (Box::new(sender), Box::new(receiver))
    }
}

struct PacketChannelSender<M> {
    sender: Sender<M>,
}

impl<M: Send> PacketSender<M> for PacketChannelSender<M> {
    fn send(&self, message: M) -> Result<(), TransportError> {
        match self.sender.try_send(message) {
            Ok(()) => Ok(()),
            // unbounded, so Full cannot happen
            Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                Err(TransportError::ChannelClosed)
            }
        }
    }
}

struct PacketChannelReceiver<M> {
    receiver: Receiver<M>,
}

impl<M: Send> PacketReceiver<M> for PacketChannelReceiver<M> {
    fn receive(&mut self) -> Result<Option<M>, TransportError> {
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(TransportError::ChannelClosed),
        }
    }
}
