pub mod telegram;

use crate::Result;

pub trait Notifier {
    fn send(&self, text: &str) -> Result<()>;
}
