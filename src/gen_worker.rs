use crate::ai::{generate_questions, OpenRouterClient};
use crate::logger;
use crate::models::{GenRequest, GenResponse};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

/// Run the question-generation gateway off the caller's thread. Requests
/// arrive over the channel one at a time (the store's in-flight gate
/// guarantees a single outstanding request) and every request produces
/// exactly one response, success or error.
pub fn spawn_gen_worker(
    gen_tx: Sender<GenResponse>,
    gen_rx: Receiver<GenRequest>,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("revenge-vault::gen_worker".to_string())
        .spawn(move || loop {
            match gen_rx.recv() {
                Ok(GenRequest::Generate {
                    subject_id,
                    context,
                    style_examples,
                    count,
                }) => {
                    logger::log(&format!(
                        "Worker received generation request for subject {}",
                        subject_id
                    ));
                    let client = match OpenRouterClient::new() {
                        Ok(client) => client,
                        Err(e) => {
                            let _ = gen_tx.send(GenResponse::Error {
                                subject_id,
                                error: format!("Failed to create AI client: {}", e),
                            });
                            continue;
                        }
                    };

                    let rt = tokio::runtime::Runtime::new().unwrap();

                    let result = rt.block_on(async {
                        generate_questions(&client, &context, &style_examples, count, None).await
                    });

                    match result {
                        Ok(questions) => {
                            logger::log(&format!(
                                "Worker sending {} generated questions",
                                questions.len()
                            ));
                            let _ = gen_tx.send(GenResponse::Generated {
                                subject_id,
                                questions,
                            });
                        }
                        Err(e) => {
                            logger::log(&format!("Worker error: {}", e));
                            let _ = gen_tx.send(GenResponse::Error {
                                subject_id,
                                error: format!("Question generation failed: {}", e),
                            });
                        }
                    }
                }
                Err(_) => {
                    // Channel disconnected, exit worker
                    logger::log("Worker channel disconnected, exiting");
                    break;
                }
            }
        })
        .expect("Failed to spawn generation worker thread")
}
