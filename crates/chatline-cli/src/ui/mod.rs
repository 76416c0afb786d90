pub mod chat;

pub trait AppController {
    fn update(&mut self, action: crate::tui::Action);
    fn render(&mut self, f: &mut ratatui::Frame);
    fn should_quit(&self) -> bool;
}
