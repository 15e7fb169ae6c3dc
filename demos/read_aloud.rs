use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;

use readaloud::{
    content::load_or_empty,
    notice::LogNotifier,
    toc::build_toc,
    EngineErrorKind, EngineEvent, PlaybackController, ReaderConfig, SpeechEngine, SpeechParams,
    UtteranceId,
};

/// Engine that prints what it would say and queues lifecycle events the
/// way a platform engine dispatches them onto the UI event loop.
struct ConsoleEngine {
    next_id: u64,
    current: Option<UtteranceId>,
    events: Rc<RefCell<VecDeque<EngineEvent>>>,
}

impl SpeechEngine for ConsoleEngine {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, text: &str, params: &SpeechParams) -> Result<UtteranceId, EngineErrorKind> {
        self.next_id += 1;
        let id = UtteranceId(self.next_id);
        println!("[{id} @ {:.1}x] {text}", params.rate);
        self.current = Some(id);
        self.events.borrow_mut().push_back(EngineEvent::started(id));
        Ok(id)
    }

    fn pause(&mut self, utterance: UtteranceId) {
        println!("[{utterance}] paused");
    }

    fn resume(&mut self, utterance: UtteranceId) {
        println!("[{utterance}] resumed");
    }

    fn cancel(&mut self) {
        if let Some(id) = self.current.take() {
            self.events
                .borrow_mut()
                .push_back(EngineEvent::failed(id, EngineErrorKind::Interrupted));
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ReaderConfig::from_json_file(&PathBuf::from(path))?,
        None => ReaderConfig::default(),
    };

    let blocks = load_or_empty(&config.data_path);
    for entry in build_toc(&blocks) {
        println!("#{} {} ({})", entry.anchor, entry.title, entry.cited_label);
    }

    let events = Rc::new(RefCell::new(VecDeque::new()));
    let engine = ConsoleEngine {
        next_id: 0,
        current: None,
        events: events.clone(),
    };
    let mut controller =
        PlaybackController::with_config(engine, LogNotifier, config.controller.clone());

    let pump = |controller: &mut PlaybackController<ConsoleEngine, LogNotifier>| {
        loop {
            let next = events.borrow_mut().pop_front();
            let Some(event) = next else { break };
            controller.handle_event(event);
        }
    };

    for (index, block) in blocks.iter().enumerate().take(2) {
        if controller.request_speech(&block.content, index).is_ok() {
            pump(&mut controller);
            println!("state: {:?}", controller.state());
        }
    }

    if let Some(index) = controller.speaking_index() {
        let html = &blocks[index].content;
        controller.request_speech(html, index)?;
        println!("state: {:?}", controller.state());
        controller.request_speech(html, index)?;
        println!("state: {:?}", controller.state());
    }

    controller.stop_speech();
    pump(&mut controller);
    println!("state: {:?}", controller.state());
    Ok(())
}
