use crate::error::BookingError;

pub const MY_SENDER_NAME: &str = "You";
pub const JUST_NOW: &str = "Just now";

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    id: String,
    text: String,
    sender: String,
    time: String,
    is_me: bool,
}

impl ChatMessage {
    pub fn new(id: &str, text: &str, sender: &str, time: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            sender: sender.to_string(),
            time: time.to_string(),
            is_me: sender == MY_SENDER_NAME,
        }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_text(&self) -> &str {
        &self.text
    }

    pub fn get_sender(&self) -> &str {
        &self.sender
    }

    pub fn get_time(&self) -> &str {
        &self.time
    }

    pub fn is_me(&self) -> bool {
        self.is_me
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chat {
    id: String,
    name: String,
    last_message: String,
    time: String,
    unread: u32,
    is_community: bool,
    messages: Vec<ChatMessage>,
}

impl Chat {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            last_message: String::new(),
            time: String::new(),
            unread: 0,
            is_community: false,
            messages: vec![],
        }
    }

    pub fn with_last_message(self, last_message: &str, time: &str) -> Self {
        Self {
            last_message: last_message.to_string(),
            time: time.to_string(),
            ..self
        }
    }

    pub fn with_unread(self, unread: u32) -> Self {
        Self { unread, ..self }
    }

    pub fn with_is_community(self, is_community: bool) -> Self {
        Self {
            is_community,
            ..self
        }
    }

    pub fn with_messages(self, messages: Vec<ChatMessage>) -> Self {
        Self { messages, ..self }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_last_message(&self) -> &str {
        &self.last_message
    }

    pub fn get_time(&self) -> &str {
        &self.time
    }

    pub fn get_unread(&self) -> u32 {
        self.unread
    }

    pub fn is_community(&self) -> bool {
        self.is_community
    }

    pub fn get_messages(&self) -> &Vec<ChatMessage> {
        &self.messages
    }
}

// 一覧と開いているチャット
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ChatInbox {
    chats: Vec<Chat>,
    opened_id: Option<String>,
}

impl ChatInbox {
    pub fn new(chats: Vec<Chat>) -> Self {
        Self {
            chats,
            opened_id: None,
        }
    }

    pub fn get_chats(&self) -> &Vec<Chat> {
        &self.chats
    }

    pub fn get_opened(&self) -> Option<&Chat> {
        let id = self.opened_id.as_ref()?;
        self.chats.iter().find(|chat| &chat.id == id)
    }

    // 開くと未読は消える
    pub fn open(&mut self, id: &str) -> Result<&Chat, BookingError> {
        let chat = self
            .chats
            .iter_mut()
            .find(|chat| chat.id == id)
            .ok_or_else(|| BookingError::UnknownChat(id.to_string()))?;

        chat.unread = 0;
        self.opened_id = Some(id.to_string());
        Ok(chat)
    }

    // 空白だけの文か、開いているチャットが無ければ何もしない
    pub fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let id = match &self.opened_id {
            Some(id) => id.clone(),
            None => return false,
        };
        let chat = match self.chats.iter_mut().find(|chat| chat.id == id) {
            Some(chat) => chat,
            None => return false,
        };

        let message_id = format!("{}m{}", chat.id, chat.messages.len() + 1);
        chat.messages
            .push(ChatMessage::new(&message_id, text, MY_SENDER_NAME, JUST_NOW));
        chat.last_message = text.to_string();
        chat.time = JUST_NOW.to_string();

        log::debug!("sent {} to chat {}", message_id, chat.id);
        true
    }
}

#[cfg(test)]
fn sample_inbox() -> ChatInbox {
    ChatInbox::new(vec![
        Chat::new("c1", "Futsal Jakarta Barat")
            .with_last_message("Oke, sampai ketemu besok", "10:36 AM")
            .with_unread(3)
            .with_is_community(true)
            .with_messages(vec![
                ChatMessage::new("c1m1", "Halo semua", "Ahmad", "10:30 AM"),
                ChatMessage::new("c1m2", "Oke, sampai ketemu besok", "You", "10:36 AM"),
            ]),
        Chat::new("c2", "Badminton Lovers").with_last_message("Turnamen apa ya?", "Yesterday"),
    ])
}

#[test]
fn test_chat_message_new_自分の発言かどうかは送信者で決まること() {
    assert!(ChatMessage::new("m1", "hi", "You", "Just now").is_me());
    assert!(!ChatMessage::new("m2", "hi", "Ahmad", "Just now").is_me());
}

#[test]
fn test_open_未読が消えること() {
    let mut inbox = sample_inbox();

    let chat = inbox.open("c1").unwrap();
    assert_eq!(chat.get_unread(), 0);
    assert_eq!(inbox.get_opened().map(|chat| chat.get_id()), Some("c1"));
}

#[test]
fn test_open_存在しないチャットは異常系() {
    let mut inbox = sample_inbox();

    assert_eq!(
        inbox.open("c9"),
        Err(BookingError::UnknownChat("c9".to_string()))
    );
    assert_eq!(inbox.get_opened(), None);
}

#[test]
fn test_send_末尾に追加され最新のメッセージが更新されること() {
    let mut inbox = sample_inbox();
    inbox.open("c2").unwrap();

    assert!(inbox.send("  Saya ikut  "));

    let chat = inbox.get_opened().unwrap();
    let last = chat.get_messages().last().unwrap();
    assert_eq!(last.get_id(), "c2m1");
    assert_eq!(last.get_text(), "Saya ikut");
    assert_eq!(last.get_sender(), "You");
    assert!(last.is_me());
    assert_eq!(chat.get_last_message(), "Saya ikut");
    assert_eq!(chat.get_time(), "Just now");
}

#[test]
fn test_send_空白だけの文は送らないこと() {
    let mut inbox = sample_inbox();
    inbox.open("c1").unwrap();
    let before = inbox.clone();

    assert!(!inbox.send("   "));
    assert_eq!(inbox, before);
}

#[test]
fn test_send_チャットを開いていなければ何もしないこと() {
    let mut inbox = sample_inbox();
    let before = inbox.clone();

    assert!(!inbox.send("hello"));
    assert_eq!(inbox, before);
}
