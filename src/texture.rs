//! Registry of named colour/opacity mappings and the lookup textures sampled from them.
//!
//! A texture is created the first time it is requested and then kept in sync
//! with its sources: every effective edit to the registered colormap or
//! opacity map resamples the texture in place, inside the same call as the
//! edit. Handles returned by [`TextureCache::get_texture`] share one buffer,
//! so a renderer holding a handle sees new pixels without asking again.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::{debug, error, info, warn};

use crate::colormaps::{Colormap, OpacityMap, TextureColormap};
use crate::logging::log_timed_operation;
use crate::reactive::{Observable, Subscription, WeakObservable};

/// Default texture width in pixels
pub const DEFAULT_WIDTH: u32 = 256;

/// Default texture height in pixels
pub const DEFAULT_HEIGHT: u32 = 1;

pub type SharedColormap = Observable<Colormap>;
pub type SharedOpacityMap = Observable<OpacityMap>;

/// Identifies one cached texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureKey {
    pub colormap: String,
    pub opacity: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl TextureKey {
    /// A zero width or height is raised to 1, so every lookup of the same
    /// request resolves to the same key.
    pub fn new(colormap: &str, opacity: Option<&str>, width: u32, height: u32) -> Self {
        Self {
            colormap: colormap.to_string(),
            opacity: opacity.map(str::to_string),
            width: clamp_size("width", width),
            height: clamp_size("height", height),
        }
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}x{}",
            self.colormap,
            self.opacity.as_deref().unwrap_or("no-opacity"),
            self.width,
            self.height
        )
    }
}

/// Row-major RGBA float pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
    needs_update: bool,
    generation: u64,
}

impl PixelBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize * 4],
            needs_update: false,
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// All channels, `width * height * 4` floats.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// RGBA at one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    /// Set by every resample until a consumer calls [`Texture::mark_uploaded`].
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Number of completed sampling passes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn replace(&mut self, data: Vec<f32>) {
        self.data = data;
        self.needs_update = true;
        self.generation += 1;
    }
}

/// A shared handle to one cached pixel buffer.
#[derive(Debug, Clone)]
pub struct Texture {
    buffer: Arc<RwLock<PixelBuffer>>,
}

impl Texture {
    fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(PixelBuffer::new(width, height))),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, PixelBuffer> {
        self.buffer.read()
    }

    /// Whether both handles share one buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Acknowledge the current contents, e.g. after a GPU upload.
    pub fn mark_uploaded(&self) {
        self.buffer.write().needs_update = false;
    }

    fn downgrade(&self) -> Weak<RwLock<PixelBuffer>> {
        Arc::downgrade(&self.buffer)
    }
}

/// Sample a colormap (and optional opacity map) on a regular grid.
///
/// Pixel `(px, py)` samples `x = px / (width - 1)` and `y = py / (height - 1)`,
/// with a single column or row sampling at 0. Opacity only reads `x`.
pub fn sample_texture<C>(
    colormap: &C,
    opacity: Option<&OpacityMap>,
    width: u32,
    height: u32,
) -> Vec<f32>
where
    C: TextureColormap + ?Sized,
{
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for py in 0..height {
        let y = if height == 1 {
            0.0
        } else {
            py as f64 / (height - 1) as f64
        };
        for px in 0..width {
            let x = if width == 1 {
                0.0
            } else {
                px as f64 / (width - 1) as f64
            };
            let [r, g, b] = colormap.color_for_texture(x, y);
            data.push(r as f32 / 255.0);
            data.push(g as f32 / 255.0);
            data.push(b as f32 / 255.0);
            data.push(opacity.map_or(1.0, |map| map.opacity_at(x) as f32));
        }
    }
    data
}

struct Entry {
    texture: Texture,
    _subscriptions: Vec<Subscription>,
}

/// Resample `target` from the current state of its sources.
fn refresh(
    key: &TextureKey,
    colormap: &WeakObservable<Colormap>,
    opacity: Option<&WeakObservable<OpacityMap>>,
    target: &Weak<RwLock<PixelBuffer>>,
) {
    let (Some(colormap), Some(target)) = (colormap.upgrade(), target.upgrade()) else {
        return;
    };
    let opacity = opacity.and_then(WeakObservable::upgrade);

    log_timed_operation("texture_sample", || {
        let data = {
            let colormap = colormap.read();
            let opacity = opacity.as_ref().map(|map| map.read());
            sample_texture(&*colormap, opacity.as_deref(), key.width, key.height)
        };
        target.write().replace(data);
    });
    debug!(texture = %key, "Texture resampled");
}

/// The registry of named mappings and their textures.
///
/// One instance is owned by the running application (see [`crate::Session`]).
#[derive(Default)]
pub struct TextureCache {
    colormaps: HashMap<String, SharedColormap>,
    opacity_maps: HashMap<String, SharedOpacityMap>,
    textures: HashMap<TextureKey, Entry>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a colormap under `name`.
    ///
    /// Textures already built from an earlier registration under the same name
    /// are rebound to the new colormap and resampled in place.
    pub fn register_colormap(&mut self, name: &str, colormap: SharedColormap) {
        let replaced = self
            .colormaps
            .insert(name.to_string(), colormap)
            .is_some();
        info!(name = name, replaced = replaced, "Colormap registered");
        if replaced {
            self.rebind(|key| key.colormap == name);
        }
    }

    /// Register (or replace) an opacity map under `name`.
    ///
    /// Textures that already name this opacity map are rebound, including
    /// ones created before any map was registered under the name.
    pub fn register_opacity_map(&mut self, name: &str, opacity_map: SharedOpacityMap) {
        let replaced = self
            .opacity_maps
            .insert(name.to_string(), opacity_map)
            .is_some();
        info!(name = name, replaced = replaced, "Opacity map registered");
        self.rebind(|key| key.opacity.as_deref() == Some(name));
    }

    pub fn colormap(&self, name: &str) -> Option<SharedColormap> {
        self.colormaps.get(name).cloned()
    }

    pub fn opacity_map(&self, name: &str) -> Option<SharedOpacityMap> {
        self.opacity_maps.get(name).cloned()
    }

    /// The texture for this key, sampled on first request.
    ///
    /// Returns `None` (and logs) when no colormap is registered under
    /// `colormap`. An unregistered opacity name samples as fully opaque until
    /// a map is registered under it.
    pub fn get_texture(
        &mut self,
        colormap: &str,
        opacity: Option<&str>,
        width: u32,
        height: u32,
    ) -> Option<Texture> {
        let key = TextureKey::new(colormap, opacity, width, height);
        if let Some(entry) = self.textures.get(&key) {
            return Some(entry.texture.clone());
        }

        if !self.colormaps.contains_key(colormap) {
            error!(colormap = colormap, "Colormap not registered");
            return None;
        }

        let texture = Texture::new(key.width, key.height);
        let subscriptions = self.bind(&key, &texture);
        debug!(texture = %key, "Texture created");
        self.textures.insert(
            key,
            Entry {
                texture: texture.clone(),
                _subscriptions: subscriptions,
            },
        );
        Some(texture)
    }

    /// [`Self::get_texture`] at the default 256×1 size.
    pub fn get_texture_default(
        &mut self,
        colormap: &str,
        opacity: Option<&str>,
    ) -> Option<Texture> {
        self.get_texture(colormap, opacity, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Subscribe `texture` to the sources named by `key` and sample it once.
    fn bind(&self, key: &TextureKey, texture: &Texture) -> Vec<Subscription> {
        let Some(colormap) = self.colormaps.get(&key.colormap) else {
            return Vec::new();
        };
        let opacity = key.opacity.as_deref().and_then(|name| {
            let map = self.opacity_maps.get(name);
            if map.is_none() {
                warn!(
                    opacity = name,
                    texture = %key,
                    "Opacity map not registered, sampling as opaque"
                );
            }
            map
        });

        let weak_colormap = colormap.downgrade();
        let weak_opacity = opacity.map(Observable::downgrade);
        let target = texture.downgrade();
        let listener_key = key.clone();
        let resample = Arc::new(move || {
            refresh(
                &listener_key,
                &weak_colormap,
                weak_opacity.as_ref(),
                &target,
            )
        });

        resample();

        let mut subscriptions = Vec::with_capacity(2);
        let on_colormap = Arc::clone(&resample);
        subscriptions.push(colormap.subscribe(move || on_colormap()));
        if let Some(opacity) = opacity {
            let on_opacity = Arc::clone(&resample);
            subscriptions.push(opacity.subscribe(move || on_opacity()));
        }
        subscriptions
    }

    /// Re-subscribe and resample every texture whose key matches.
    fn rebind(&mut self, matches: impl Fn(&TextureKey) -> bool) {
        let keys: Vec<TextureKey> = self
            .textures
            .keys()
            .filter(|&key| matches(key))
            .cloned()
            .collect();
        for key in keys {
            let Some(texture) = self.textures.get(&key).map(|entry| entry.texture.clone()) else {
                continue;
            };
            // Old subscriptions go away when the entry is replaced.
            let subscriptions = self.bind(&key, &texture);
            self.textures.insert(
                key.clone(),
                Entry {
                    texture,
                    _subscriptions: subscriptions,
                },
            );
            debug!(texture = %key, "Texture rebound");
        }
    }

    /// Release one texture and stop tracking its sources.
    pub fn dispose(
        &mut self,
        colormap: &str,
        opacity: Option<&str>,
        width: u32,
        height: u32,
    ) -> bool {
        let key = TextureKey::new(colormap, opacity, width, height);
        let removed = self.textures.remove(&key).is_some();
        if removed {
            debug!(texture = %key, "Texture disposed");
        }
        removed
    }

    /// Release every texture. Registrations are kept.
    pub fn dispose_all(&mut self) {
        let count = self.textures.len();
        self.textures.clear();
        info!(count = count, "All textures disposed");
    }

    /// Release every texture and forget every registration.
    pub fn clear(&mut self) {
        self.dispose_all();
        self.colormaps.clear();
        self.opacity_maps.clear();
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TextureKey> {
        self.textures.keys()
    }
}

impl fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureCache")
            .field("colormaps", &self.colormaps.keys().collect::<Vec<_>>())
            .field(
                "opacity_maps",
                &self.opacity_maps.keys().collect::<Vec<_>>(),
            )
            .field("textures", &self.textures.len())
            .finish()
    }
}

fn clamp_size(axis: &'static str, size: u32) -> u32 {
    if size == 0 {
        warn!(axis = axis, "Texture size must be positive, using 1");
        1
    } else {
        size
    }
}
