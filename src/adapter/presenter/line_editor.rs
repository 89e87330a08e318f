use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// プロンプト1行分の編集状態。
// cursor_x は画面に表示されている「文字」単位
#[derive(Clone, Debug, PartialEq)]
pub struct LineEditor {
    header: String,
    line: String,
    cursor_x: usize,
}

fn char_width(ch: Option<char>) -> u16 {
    ch.and_then(UnicodeWidthChar::width).unwrap_or(0) as u16
}

impl LineEditor {
    pub fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            line: String::new(),
            cursor_x: 0,
        }
    }

    pub fn get_header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, header: &str) {
        self.header = header.to_string();
    }

    pub fn get_line(&self) -> &str {
        &self.line
    }

    pub fn get_cursor_x(&self) -> usize {
        self.cursor_x
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    fn char_count(&self) -> usize {
        self.line.chars().count()
    }

    // 多バイト文字の挿入位置
    fn byte_offset_for_insert(&self) -> usize {
        self.line
            .char_indices()
            .nth(self.cursor_x)
            .map(|(offset, _)| offset)
            .unwrap_or(self.line.len())
    }

    // 削除できない時はNone。例えば、文字列が空の時
    fn byte_offset_for_deletion(&self) -> Option<usize> {
        if self.cursor_x == 0 {
            return None;
        }

        self.line
            .char_indices()
            .nth(self.cursor_x - 1)
            .map(|(offset, _)| offset)
    }

    pub fn insert(&mut self, c: char) {
        let byte_offset = self.byte_offset_for_insert();
        self.line.insert(byte_offset, c);
        self.cursor_x += 1;
    }

    pub fn backspace(&mut self) -> bool {
        match self.byte_offset_for_deletion() {
            Some(byte_offset) => {
                self.line.remove(byte_offset);
                self.cursor_x -= 1;
                true
            }
            None => false,
        }
    }

    // カーソルを動かした表示幅を返す。動けなければ0
    pub fn move_left(&mut self) -> u16 {
        if self.cursor_x == 0 {
            return 0;
        }

        let width = char_width(self.line.chars().nth(self.cursor_x - 1));
        self.cursor_x -= 1;
        width
    }

    pub fn move_right(&mut self) -> u16 {
        if self.cursor_x >= self.char_count() {
            return 0;
        }

        let width = char_width(self.line.chars().nth(self.cursor_x));
        self.cursor_x += 1;
        width
    }

    pub fn move_home(&mut self) {
        self.cursor_x = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_x = self.char_count();
    }

    pub fn clear(&mut self) {
        self.line.clear();
        self.cursor_x = 0;
    }

    // カーソルより後ろを消す
    pub fn kill_to_end(&mut self) {
        let byte_offset = self.byte_offset_for_insert();
        self.line.truncate(byte_offset);
    }

    pub fn take_line(&mut self) -> String {
        let line = self.line.clone();
        self.clear();
        line
    }

    // 行頭からカーソルまでの表示幅
    pub fn width_for_rerender(&self) -> u16 {
        let mut width = UnicodeWidthStr::width(self.header.as_str());

        for ch in self.line.chars().take(self.cursor_x) {
            width += UnicodeWidthChar::width(ch).unwrap_or(0);
        }

        width as u16
    }
}

#[cfg(test)]
fn editor_with(line: &str) -> LineEditor {
    let mut editor = LineEditor::new("courtbook>");
    for c in line.chars() {
        editor.insert(c);
    }
    editor
}

#[test]
fn test_insert_途中に多バイト文字を挿入できること() {
    let mut editor = editor_with("例1の文字列");
    editor.move_home();
    for _ in 0..3 {
        editor.move_right();
    }
    editor.insert('新');

    assert_eq!(editor.get_line(), "例1の新文字列");
    assert_eq!(editor.get_cursor_x(), 4);
}

#[test]
fn test_backspace_先頭では何もしないこと() {
    let mut editor = editor_with("あ");
    editor.move_home();

    assert!(!editor.backspace());
    assert_eq!(editor.get_line(), "あ");
}

#[test]
fn test_backspace_カーソル直前の文字を消すこと() {
    let mut editor = editor_with("予約い");
    editor.move_left();

    assert!(editor.backspace());
    assert_eq!(editor.get_line(), "予い");
    assert_eq!(editor.get_cursor_x(), 1);
}

#[test]
fn test_move_left_全角は幅2() {
    let mut editor = editor_with("aあ");

    assert_eq!(editor.move_left(), 2);
    assert_eq!(editor.move_left(), 1);
    assert_eq!(editor.move_left(), 0);
    assert_eq!(editor.get_cursor_x(), 0);
}

#[test]
fn test_move_right_末尾では動かないこと() {
    let mut editor = editor_with("あ");
    editor.move_home();

    assert_eq!(editor.move_right(), 2);
    assert_eq!(editor.move_right(), 0);
}

#[test]
fn test_width_for_rerender_ヘッダを含むこと() {
    let mut editor = editor_with("book 日");
    assert_eq!(editor.width_for_rerender(), 17); // "courtbook>book 日"

    editor.move_home();
    assert_eq!(editor.width_for_rerender(), 10);
}

#[test]
fn test_kill_to_end_カーソル以降を消すこと() {
    let mut editor = editor_with("date 12");
    editor.move_left();
    editor.move_left();
    editor.kill_to_end();

    assert_eq!(editor.get_line(), "date ");
}

#[test]
fn test_take_line_取り出すと空になること() {
    let mut editor = editor_with("pay");

    assert_eq!(editor.take_line(), "pay");
    assert!(editor.is_empty());
    assert_eq!(editor.get_cursor_x(), 0);
}
