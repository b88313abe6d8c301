use serde_json::json;

use crate::error::{Result, WidgetError};
use crate::event::{Control, EventFlow, PageEvent};
use crate::logging::{LogLevel, Logger, WIDGETS_TARGET, emit, json_kv};

use super::{PageContext, PageWidget};

pub const CLOSED_GLYPH: char = '+';
pub const OPEN_GLYPH: char = '−';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItemMarkup {
    pub question: String,
    pub answer: String,
    /// Whether the page already ships the answer's content block.
    pub has_content_block: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionMarkup {
    pub items: Vec<AccordionItemMarkup>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItem {
    question: String,
    answer: String,
    content_block: Option<String>,
    open: bool,
}

impl AccordionItem {
    fn from_markup(markup: &AccordionItemMarkup) -> Self {
        Self {
            question: markup.question.clone(),
            answer: markup.answer.clone(),
            content_block: markup.has_content_block.then(|| markup.answer.clone()),
            open: false,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn glyph(&self) -> char {
        if self.open { OPEN_GLYPH } else { CLOSED_GLYPH }
    }

    /// The answer block, once it exists.
    pub fn content_block(&self) -> Option<&str> {
        self.content_block.as_deref()
    }

    fn open(&mut self) {
        if self.content_block.is_none() {
            self.content_block = Some(self.answer.clone());
        }
        self.open = true;
    }
}

/// Question/answer list where at most one item is open.
#[derive(Debug)]
pub struct Accordion {
    items: Vec<AccordionItem>,
    logger: Option<Logger>,
}

impl Accordion {
    pub fn mount(markup: Option<&AccordionMarkup>, logger: Option<Logger>) -> Result<Self> {
        let markup = markup.ok_or(WidgetError::MissingElement("faq-list"))?;
        if markup.items.is_empty() {
            return Err(WidgetError::MissingElement("faq-item"));
        }
        Ok(Self {
            items: markup.items.iter().map(AccordionItem::from_markup).collect(),
            logger,
        })
    }

    /// Toggle item `index`, closing every other item. Unknown indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        let Some(was_open) = self.items.get(index).map(AccordionItem::is_open) else {
            return false;
        };
        for item in self.items.iter_mut() {
            item.open = false;
        }
        if !was_open {
            self.items[index].open();
        }
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            WIDGETS_TARGET,
            "faq_toggled",
            [
                json_kv("index", json!(index)),
                json_kv("open", json!(!was_open)),
            ],
        );
        true
    }

    pub fn items(&self) -> &[AccordionItem] {
        &self.items
    }

    pub fn open_index(&self) -> Option<usize> {
        self.items.iter().position(AccordionItem::is_open)
    }
}

impl PageWidget for Accordion {
    fn name(&self) -> &str {
        "faq_accordion"
    }

    fn on_event(&mut self, _ctx: &mut PageContext, event: &PageEvent) -> Result<EventFlow> {
        if let PageEvent::Activate(Control::FaqItem(index)) = event {
            if self.toggle(*index) {
                return Ok(EventFlow::Consumed);
            }
        }
        Ok(EventFlow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accordion() -> Accordion {
        let items = (0..3)
            .map(|i| AccordionItemMarkup {
                question: format!("Question {i}?"),
                answer: format!("Answer {i}."),
                has_content_block: i == 0,
            })
            .collect();
        Accordion::mount(Some(&AccordionMarkup { items }), None).unwrap()
    }

    #[test]
    fn opening_one_closes_the_other() {
        let mut faq = accordion();
        faq.toggle(0);
        assert_eq!(faq.open_index(), Some(0));
        faq.toggle(2);
        assert_eq!(faq.open_index(), Some(2));
        assert_eq!(faq.items().iter().filter(|item| item.is_open()).count(), 1);
        assert_eq!(faq.items()[0].glyph(), CLOSED_GLYPH);
        assert_eq!(faq.items()[2].glyph(), OPEN_GLYPH);
    }

    #[test]
    fn reopening_closes() {
        let mut faq = accordion();
        faq.toggle(1);
        faq.toggle(1);
        assert_eq!(faq.open_index(), None);
    }

    #[test]
    fn content_block_is_built_lazily() {
        let mut faq = accordion();
        assert_eq!(faq.items()[0].content_block(), Some("Answer 0."));
        assert_eq!(faq.items()[1].content_block(), None);
        faq.toggle(1);
        assert_eq!(faq.items()[1].content_block(), Some("Answer 1."));
        faq.toggle(1);
        assert_eq!(faq.items()[1].content_block(), Some("Answer 1."));
    }

    #[test]
    fn unknown_item_passes_through() {
        let mut faq = accordion();
        let mut ctx = PageContext::new();
        let flow = faq
            .on_event(&mut ctx, &PageEvent::Activate(Control::FaqItem(9)))
            .unwrap();
        assert_eq!(flow, EventFlow::Continue);
    }

    #[test]
    fn empty_list_does_not_mount() {
        let err = Accordion::mount(Some(&AccordionMarkup { items: Vec::new() }), None).unwrap_err();
        assert!(matches!(err, WidgetError::MissingElement("faq-item")));
    }
}
