//! Pure Rust OCR recognizer using `pure-onnx-ocr`.
//!
//! The engine keeps interior state that cannot cross threads, so it lives on
//! one worker thread for its whole life. `recognize` sends the page image
//! over a channel and waits for the recognized lines.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use super::TextRecognizer;
use crate::error::OcrError;

/// Vertical band (pixels) within which boxes count as one text line.
const LINE_BAND: f32 = 20.0;

/// Recognized text box: top-left x, top-left y, text.
type TextBox = (f32, f32, String);

struct Job {
    image: DynamicImage,
    reply: mpsc::Sender<Result<Vec<TextBox>, OcrError>>,
}

/// OCR recognizer backed by `pure-onnx-ocr` (no external ONNX Runtime).
pub struct OnnxRecognizer {
    jobs: mpsc::Sender<Job>,
}

impl OnnxRecognizer {
    /// Load detection and recognition models from a directory.
    ///
    /// Models are loaded on the worker thread; this waits until loading
    /// finished and reports its error, if any.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!("missing {}", path.display())));
            }
        }

        let (jobs, queue) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), OcrError>>();
        let dir = model_dir.to_path_buf();

        thread::Builder::new()
            .name("dekont-ocr".to_string())
            .spawn(move || worker(det_path, rec_path, dict_path, dir, queue, ready_tx))
            .map_err(|e| OcrError::EngineUnavailable(format!("cannot start OCR thread: {e}")))?;

        ready_rx
            .recv()
            .map_err(|_| OcrError::ModelLoad("OCR thread exited while loading".to_string()))??;

        Ok(Self { jobs })
    }
}

fn worker(
    det_path: PathBuf,
    rec_path: PathBuf,
    dict_path: PathBuf,
    model_dir: PathBuf,
    queue: mpsc::Receiver<Job>,
    ready: mpsc::Sender<Result<(), OcrError>>,
) {
    let built = pure_onnx_ocr::engine::OcrEngineBuilder::new()
        .det_model_path(&det_path)
        .rec_model_path(&rec_path)
        .dictionary_path(&dict_path)
        .build()
        .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)));

    let engine = match built {
        Ok(engine) => {
            info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());
            let _ = ready.send(Ok(()));
            engine
        }
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    // Ends when the recognizer, and with it the last sender, is dropped.
    for job in queue {
        let result = engine
            .run_from_image(&job.image)
            .map(|results| {
                results
                    .iter()
                    .map(|r| {
                        let (x, y) = top_left(&r.bounding_box);
                        (x, y, r.text.replace("[UNK]", " "))
                    })
                    .collect()
            })
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)));

        if job.reply.send(result).is_err() {
            warn!("OCR result dropped: caller went away");
        }
    }
    debug!("OCR worker stopped");
}

impl TextRecognizer for OnnxRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        debug!("Recognizing image: {}x{}", width, height);

        let (reply, result) = mpsc::channel();
        self.jobs
            .send(Job {
                image: image.clone(),
                reply,
            })
            .map_err(|_| OcrError::EngineUnavailable("OCR thread stopped".to_string()))?;
        let mut boxes = result
            .recv()
            .map_err(|_| OcrError::Recognition("OCR thread stopped".to_string()))??;

        let regions = boxes.len();
        sort_reading_order(&mut boxes);
        let text = boxes
            .into_iter()
            .map(|(_, _, text)| text)
            .collect::<Vec<_>>()
            .join("\n");

        info!(
            "OCR complete: {} text regions in {}ms",
            regions,
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }
}

/// Banded rows top to bottom, then left to right.
fn sort_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        let row_a = (a.1 / LINE_BAND) as i32;
        let row_b = (b.1 / LINE_BAND) as i32;
        row_a
            .cmp(&row_b)
            .then(a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
    });
}

/// Smallest x and y over the first four polygon points.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .take(4)
        .fold((f32::MAX, f32::MAX), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}
