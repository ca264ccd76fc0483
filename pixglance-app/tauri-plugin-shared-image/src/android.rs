//! JNI access to the hosting activity's intent and to `ContentResolver`.

use std::io::{self, Read};

use jni::errors::Error as JniError;
use jni::objects::{GlobalRef, JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};
use shared_image_core::capture::{ACTION_SEND, ACTION_VIEW};
use shared_image_core::content::DISPLAY_NAME_COLUMN;
use shared_image_core::{ContentMetadata, ContentResolver, Intent};
use tracing::warn;

use crate::{Error, Result};

const EXTRA_STREAM: &str = "android.intent.extra.STREAM";

const LOCAL_FRAME_CAPACITY: i32 = 16;

/// Largest chunk pulled through JNI per `read` call.
const READ_CHUNK: usize = 64 * 1024;

/// The activity the app runs in, plus the VM to reach it.
pub struct AndroidContent {
    vm: JavaVM,
    activity: GlobalRef,
}

impl AndroidContent {
    /// Bind to the activity registered in `ndk_context` by the Tauri runtime.
    pub fn from_context() -> Result<Self> {
        let ctx = ndk_context::android_context();
        let activity_ptr = ctx.context();
        if activity_ptr.is_null() {
            return Err(Error::Jni("Android context is not initialized".into()));
        }

        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }?;
        let activity = {
            let env = vm.attach_current_thread()?;
            let activity = unsafe { JObject::from_raw(activity_ptr.cast()) };
            env.new_global_ref(activity)?
        };

        Ok(Self { vm, activity })
    }

    /// Run `f` inside a local reference frame, clearing any Java exception it left behind.
    fn with_env<T, F>(&self, f: F) -> jni::errors::Result<T>
    where
        F: FnOnce(&mut JNIEnv) -> jni::errors::Result<T>,
    {
        let mut env = self.vm.attach_current_thread()?;
        let result = env.with_local_frame(LOCAL_FRAME_CAPACITY, f);
        if let Err(JniError::JavaException) = result {
            let _ = env.exception_describe();
            let _ = env.exception_clear();
        }
        result
    }

    /// Read the activity's current intent if it is a "view" or "send" intent,
    /// and clear its action so the same intent is not captured twice.
    pub fn take_activity_intent(&self) -> Result<Option<Intent>> {
        let intent = self.with_env(|env| {
            let intent = env
                .call_method(&self.activity, "getIntent", "()Landroid/content/Intent;", &[])?
                .l()?;
            if intent.is_null() {
                return Ok(None);
            }

            let action = call_string(env, &intent, "getAction")?;
            if !matches!(action.as_deref(), Some(ACTION_VIEW) | Some(ACTION_SEND)) {
                return Ok(None);
            }

            let mime_type = call_string(env, &intent, "getType")?;
            let data = env
                .call_method(&intent, "getData", "()Landroid/net/Uri;", &[])?
                .l()?;
            let data = object_to_string(env, &data)?;

            let key = env.new_string(EXTRA_STREAM)?;
            let stream = env
                .call_method(
                    &intent,
                    "getParcelableExtra",
                    "(Ljava/lang/String;)Landroid/os/Parcelable;",
                    &[JValue::Object(&key)],
                )?
                .l()?;
            let stream = object_to_string(env, &stream)?;

            let null = JObject::null();
            env.call_method(
                &intent,
                "setAction",
                "(Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&null)],
            )?;

            Ok(Some(Intent::from_parts(action.as_deref(), data, mime_type, stream)))
        })?;

        Ok(intent)
    }
}

impl ContentResolver for AndroidContent {
    fn query_metadata(&self, uri: &str) -> io::Result<Option<ContentMetadata>> {
        self.with_env(|env| {
            let resolver = content_resolver(env, &self.activity)?;
            let uri = parse_uri(env, uri)?;
            let null = JObject::null();
            let cursor = env
                .call_method(
                    &resolver,
                    "query",
                    "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
                    &[
                        JValue::Object(&uri),
                        JValue::Object(&null),
                        JValue::Object(&null),
                        JValue::Object(&null),
                        JValue::Object(&null),
                    ],
                )?
                .l()?;
            if cursor.is_null() {
                return Ok(None);
            }

            let row = first_row(env, &cursor);
            let closed = env.call_method(&cursor, "close", "()V", &[]);
            let row = row?;
            closed?;
            Ok(row)
        })
        .map_err(jni_to_io)
    }

    fn open_stream(&self, uri: &str) -> io::Result<Box<dyn Read + '_>> {
        let stream = self
            .with_env(|env| {
                let resolver = content_resolver(env, &self.activity)?;
                let uri = parse_uri(env, uri)?;
                let input = env
                    .call_method(
                        &resolver,
                        "openInputStream",
                        "(Landroid/net/Uri;)Ljava/io/InputStream;",
                        &[JValue::Object(&uri)],
                    )?
                    .l()?;
                if input.is_null() {
                    return Err(JniError::NullPtr("openInputStream"));
                }
                env.new_global_ref(input)
            })
            .map_err(jni_to_io)?;

        Ok(Box::new(JavaInputStream {
            content: self,
            stream,
        }))
    }
}

/// A `java.io.InputStream` read through JNI. Closed on drop.
struct JavaInputStream<'a> {
    content: &'a AndroidContent,
    stream: GlobalRef,
}

impl Read for JavaInputStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(READ_CHUNK);
        let stream = &self.stream;

        self.content
            .with_env(|env| {
                let array = env.new_byte_array(len as i32)?;
                let read = env
                    .call_method(
                        stream,
                        "read",
                        "([BII)I",
                        &[JValue::Object(&array), JValue::Int(0), JValue::Int(len as i32)],
                    )?
                    .i()?;
                // -1 is end of stream.
                if read <= 0 {
                    return Ok(0);
                }
                let read = read as usize;
                let bytes = env.convert_byte_array(&array)?;
                buf[..read].copy_from_slice(&bytes[..read]);
                Ok(read)
            })
            .map_err(jni_to_io)
    }
}

impl Drop for JavaInputStream<'_> {
    fn drop(&mut self) {
        let stream = &self.stream;
        if let Err(e) = self
            .content
            .with_env(|env| env.call_method(stream, "close", "()V", &[]).map(|_| ()))
        {
            warn!("Failed to close content stream: {}", e);
        }
    }
}

fn content_resolver<'local>(
    env: &mut JNIEnv<'local>,
    activity: &GlobalRef,
) -> jni::errors::Result<JObject<'local>> {
    env.call_method(
        activity,
        "getContentResolver",
        "()Landroid/content/ContentResolver;",
        &[],
    )?
    .l()
}

fn parse_uri<'local>(env: &mut JNIEnv<'local>, uri: &str) -> jni::errors::Result<JObject<'local>> {
    let uri = env.new_string(uri)?;
    env.call_static_method(
        "android/net/Uri",
        "parse",
        "(Ljava/lang/String;)Landroid/net/Uri;",
        &[JValue::Object(&uri)],
    )?
    .l()
}

/// First cursor row, reduced to the display-name column.
fn first_row(env: &mut JNIEnv, cursor: &JObject) -> jni::errors::Result<Option<ContentMetadata>> {
    if !env.call_method(cursor, "moveToFirst", "()Z", &[])?.z()? {
        return Ok(None);
    }

    let column = env.new_string(DISPLAY_NAME_COLUMN)?;
    let index = env
        .call_method(
            cursor,
            "getColumnIndex",
            "(Ljava/lang/String;)I",
            &[JValue::Object(&column)],
        )?
        .i()?;
    if index < 0 {
        return Ok(Some(ContentMetadata::new()));
    }

    let value = env
        .call_method(cursor, "getString", "(I)Ljava/lang/String;", &[JValue::Int(index)])?
        .l()?;
    let value = java_string(env, value)?;
    Ok(Some(
        ContentMetadata::new().with_column(DISPLAY_NAME_COLUMN, value),
    ))
}

fn call_string(env: &mut JNIEnv, obj: &JObject, method: &str) -> jni::errors::Result<Option<String>> {
    let value = env
        .call_method(obj, method, "()Ljava/lang/String;", &[])?
        .l()?;
    java_string(env, value)
}

/// `toString()` of a possibly-null object (used for `Uri`s).
fn object_to_string(env: &mut JNIEnv, obj: &JObject) -> jni::errors::Result<Option<String>> {
    if obj.is_null() {
        return Ok(None);
    }
    call_string(env, obj, "toString")
}

fn java_string(env: &mut JNIEnv, value: JObject) -> jni::errors::Result<Option<String>> {
    if value.is_null() {
        return Ok(None);
    }
    let value = JString::from(value);
    let value: String = env.get_string(&value)?.into();
    Ok(Some(value))
}

fn jni_to_io(err: JniError) -> io::Error {
    io::Error::other(err.to_string())
}
