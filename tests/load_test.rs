//! Concurrent load against a single server.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use employees_sdk::NewEmployee;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_concurrent_writers_get_distinct_ids() {
    let server = common::start_default_server().await;

    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let start = Instant::now();
    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = server.client();
        tasks.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            let mut latencies = Vec::new();
            for i in 0..requests_per_task {
                let req_start = Instant::now();
                let employee = NewEmployee {
                    name: format!("worker-{}-{}", task, i),
                    position: "Eng".into(),
                    level: "mid".into(),
                    ..Default::default()
                };
                if let Ok(id) = client.create(&employee).await {
                    ids.push(id);
                    latencies.push(req_start.elapsed());
                }
            }
            (ids, latencies)
        }));
    }

    let mut ids = HashSet::new();
    let mut latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        let (task_ids, task_latencies) = task.await.unwrap();
        ids.extend(task_ids);
        latencies.extend(task_latencies);
    }
    let duration = start.elapsed();

    assert_eq!(ids.len(), total_requests, "every insert should get its own id");
    let listed = server.client().list().await.unwrap();
    assert_eq!(listed.len(), total_requests);

    latencies.sort();
    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", total_requests as f64 / duration.as_secs_f64());
    println!("P50 Latency:    {:?}", latencies[latencies.len() / 2]);
    println!("-------------------------\n");

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_merges_on_one_document() {
    let server = common::start_default_server().await;
    let client = server.client();
    let id = client
        .create_raw(&json!({"name": "A", "position": "Eng", "level": "junior"}))
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for i in 0..10 {
        let client = server.client();
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            let mut fields = serde_json::Map::new();
            fields.insert(format!("field_{}", i), json!(i));
            client.update(&id, &Value::Object(fields)).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let employee = client.get(&id).await.unwrap();
    for i in 0..10 {
        assert_eq!(employee[format!("field_{}", i)], i);
    }
    assert_eq!(employee["name"], "A");

    server.stop().await;
}
