use std::{path::PathBuf, sync::Arc};

use digest_store::OutputStore;

use crate::{
    keywords::KeywordExtractor, summary::ChunkedSummarizer, yt::AudioHandler, Summarizer,
    Transcriber, VideoProcessor,
};

pub struct VideoProcessorBuilder<D = (), A = (), T = (), S = ()> {
    workdir: PathBuf,
    store: D,
    audio_handler: A,
    transcriber: T,
    summarizer: S,
    keywords: KeywordExtractor,
}

impl VideoProcessorBuilder {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            store: (),
            audio_handler: (),
            transcriber: (),
            summarizer: (),
            keywords: KeywordExtractor::default(),
        }
    }
}

impl<D, A, T, S> VideoProcessorBuilder<D, A, T, S> {
    pub fn store<D2: OutputStore + Send + Sync + 'static>(
        self,
        store: D2,
    ) -> VideoProcessorBuilder<D2, A, T, S> {
        VideoProcessorBuilder {
            workdir: self.workdir,
            store,
            audio_handler: self.audio_handler,
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            keywords: self.keywords,
        }
    }

    pub fn audio_handler<A2: AudioHandler + Send + Sync + 'static>(
        self,
        audio_handler: A2,
    ) -> VideoProcessorBuilder<D, A2, T, S> {
        VideoProcessorBuilder {
            workdir: self.workdir,
            store: self.store,
            audio_handler,
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            keywords: self.keywords,
        }
    }

    pub fn transcriber<T2: Transcriber + Send + Sync + 'static>(
        self,
        transcriber: T2,
    ) -> VideoProcessorBuilder<D, A, T2, S> {
        VideoProcessorBuilder {
            workdir: self.workdir,
            store: self.store,
            audio_handler: self.audio_handler,
            transcriber,
            summarizer: self.summarizer,
            keywords: self.keywords,
        }
    }

    /// The summarizer is shared with the document routes, hence the `Arc`
    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: Arc<ChunkedSummarizer<S2>>,
    ) -> VideoProcessorBuilder<D, A, T, Arc<ChunkedSummarizer<S2>>> {
        VideoProcessorBuilder {
            workdir: self.workdir,
            store: self.store,
            audio_handler: self.audio_handler,
            transcriber: self.transcriber,
            summarizer,
            keywords: self.keywords,
        }
    }

    pub fn keywords(mut self, keywords: KeywordExtractor) -> Self {
        self.keywords = keywords;
        self
    }
}

impl<D, A, T, S> VideoProcessorBuilder<D, A, T, Arc<ChunkedSummarizer<S>>>
where
    D: OutputStore + Send + Sync + 'static,
    A: AudioHandler + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    pub fn build(self) -> VideoProcessor<D, A, T, S> {
        VideoProcessor {
            workdir: self.workdir,
            store: self.store,
            audio_handler: self.audio_handler,
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            keywords: self.keywords,
        }
    }
}
