//! Stand-ins for pdfium, fonts and the backend

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use pdf_sign::*;
use std::future::Future;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Renders every page of any `%PDF` input as a blank raster of fixed size
pub struct FakePages {
    pub sizes: Vec<(u32, u32)>,
}

impl FakePages {
    pub fn uniform(count: usize, width: u32, height: u32) -> Self {
        Self {
            sizes: vec![(width, height); count],
        }
    }
}

impl PageRasterizer for FakePages {
    fn rasterize(&self, pdf: &[u8], _scale: f32) -> Result<Vec<RenderedPage>> {
        if !pdf.starts_with(b"%PDF") {
            return Err(SignError::DocumentLoad("not a PDF".to_string()));
        }
        Ok(self
            .sizes
            .iter()
            .map(|&(width, height)| RenderedPage {
                width,
                height,
                rgba: vec![255; (width * height * 4) as usize],
            })
            .collect())
    }
}

/// Draws each character as a solid block half the font size wide
pub struct BlockText;

impl TextRasterizer for BlockText {
    fn fonts_ready(&self) -> impl Future<Output = Result<()>> + Send {
        std::future::ready(Ok(()))
    }

    fn rasterize_text(&self, style: &TypedStyle, scale: f32) -> Result<RgbaImage> {
        let chars = style.text.chars().count() as f32;
        let width = ((chars * style.font_size * 0.5 + 16.0) * scale) as u32;
        let height = ((style.font_size * 1.5 + 16.0) * scale) as u32;
        let c = style.color;
        Ok(RgbaImage::from_pixel(width, height, Rgba([c.r, c.g, c.b, 255])))
    }
}

pub fn typed(text: &str) -> DragPayload {
    DragPayload::Typed(TypedStyle {
        text: text.to_string(),
        ..TypedStyle::default()
    })
}

/// A canned response for the test backend
pub struct Reply {
    pub status: &'static str,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: &'static str, content_type: &'static str, body: &[u8]) -> Self {
        Self {
            status,
            content_type,
            body: body.to_vec(),
        }
    }
}

/// A request seen by the test backend
pub struct Received {
    pub request_line: String,
    pub body: Vec<u8>,
}

/// Serve exactly one HTTP request, answering with `status` and `body`
pub fn serve_once(status: &'static str, content_type: &'static str, body: &[u8]) -> (String, JoinHandle<Received>) {
    let (url, handle) = serve(vec![Reply::new(status, content_type, body)]);
    let handle = thread::spawn(move || {
        handle
            .join()
            .expect("test backend panicked")
            .pop()
            .expect("one request")
    });
    (url, handle)
}

/// Answer one connection per reply, in order. Every response closes its
/// connection so the client cannot reuse it.
pub fn serve(replies: Vec<Reply>) -> (String, JoinHandle<Vec<Received>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = thread::spawn(move || {
        replies
            .into_iter()
            .map(|reply| {
                let (mut stream, _) = listener.accept().expect("accept");
                let received = read_request(&mut BufReader::new(stream.try_clone().expect("clone stream")));
                write!(
                    stream,
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    reply.status,
                    reply.content_type,
                    reply.body.len()
                )
                .expect("response head");
                stream.write_all(&reply.body).expect("response body");
                stream.flush().expect("flush");
                received
            })
            .collect()
    });

    (format!("http://{addr}"), handle)
}

fn read_request(reader: &mut impl BufRead) -> Received {
    let mut request_line = String::new();
    reader.read_line(&mut request_line).expect("request line");

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("header line");
        if line == "\r\n" || line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("content length");
            }
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).expect("request body");

    Received {
        request_line: request_line.trim_end().to_string(),
        body,
    }
}
